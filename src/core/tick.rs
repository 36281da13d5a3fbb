//! One combat step between the player and the current enemy.
//!
//! [`combat_tick`] is the whole per-tick combat pipeline. It knows nothing
//! about floors, loot or game states; it reports whether the encounter is
//! still going and the session decides what that means.

use crate::character::player::Player;
use crate::combat::combatant::{Combatant, PeriodicOutcome};
use crate::combat::effects::{apply_enemy_spell, apply_player_cast, resolve_player_cast};
use crate::combat::enemy::Enemy;
use crate::core::constants::PERIODIC_EFFECT_INTERVAL_SECONDS;
use crate::core::events::{GameEvent, Side};
use rand::Rng;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncounterStatus {
    #[default]
    Ongoing,
    PlayerWon,
    PlayerLost,
}

/// Everything one call to [`combat_tick`] did.
#[derive(Debug, Clone, Default)]
pub struct CombatTickResult {
    /// Events in the order they happened.
    pub events: Vec<GameEvent>,
    pub status: EncounterStatus,
}

impl CombatTickResult {
    fn finish(mut self, status: EncounterStatus) -> Self {
        self.status = status;
        self
    }
}

/// Advances an encounter by `delta_seconds`.
///
/// # Arguments
/// * `accumulator` - Seconds carried toward the next periodic tick. Only the
///   whole seconds consumed are subtracted, so overshoot carries over.
///
/// # Returns
/// The events produced and whether either side died. Once a side dies the
/// rest of the tick is skipped.
pub fn combat_tick<R: Rng>(
    player: &mut Player,
    enemy: &mut Enemy,
    accumulator: &mut f64,
    delta_seconds: f64,
    rng: &mut R,
) -> CombatTickResult {
    let mut result = CombatTickResult::default();

    if !player.is_alive() {
        return result.finish(EncounterStatus::PlayerLost);
    }
    if !enemy.is_alive() {
        return result.finish(EncounterStatus::PlayerWon);
    }

    player.update_cooldowns(delta_seconds);
    enemy.update_cooldowns(delta_seconds);

    // ── Player casts ────────────────────────────────────────────
    for slot in player.ready_spells() {
        let Some(spell) = player.active_spell(slot) else {
            warn!(slot, "ready slot has no spell in inventory");
            continue;
        };
        let cast = resolve_player_cast(player, spell);
        result.events.push(GameEvent::SpellCast {
            caster: Side::Player,
            spell: cast.spell.clone(),
        });
        apply_player_cast(&cast, player, enemy, Side::Enemy, rng, &mut result.events);
        player.trigger_cooldown(slot);

        if !enemy.is_alive() {
            return result.finish(EncounterStatus::PlayerWon);
        }
    }

    // ── Enemy casts ─────────────────────────────────────────────
    for slot in enemy.ready_spells() {
        let Some(spell) = enemy.spell(slot) else {
            continue;
        };
        result.events.push(GameEvent::SpellCast {
            caster: Side::Enemy,
            spell: spell.name.clone(),
        });
        apply_enemy_spell(spell, &*enemy, player, Side::Player, rng, &mut result.events);
        enemy.trigger_cooldown(slot);

        if !player.is_alive() {
            return result.finish(EncounterStatus::PlayerLost);
        }
    }

    // ── Periodic effects ────────────────────────────────────────
    *accumulator += delta_seconds;
    while *accumulator >= PERIODIC_EFFECT_INTERVAL_SECONDS {
        let outcome = player.apply_periodic_effects();
        push_periodic(&mut result.events, Side::Player, outcome, player.current_hp());
        if !player.is_alive() {
            return result.finish(EncounterStatus::PlayerLost);
        }

        let outcome = enemy.apply_periodic_effects();
        push_periodic(&mut result.events, Side::Enemy, outcome, enemy.current_hp());
        if !enemy.is_alive() {
            return result.finish(EncounterStatus::PlayerWon);
        }

        *accumulator -= PERIODIC_EFFECT_INTERVAL_SECONDS;
    }

    result
}

fn push_periodic(events: &mut Vec<GameEvent>, target: Side, outcome: PeriodicOutcome, hp_after: u32) {
    if outcome != PeriodicOutcome::Unchanged {
        events.push(GameEvent::Periodic {
            target,
            outcome,
            hp_after,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::loadout::SlotKind;
    use crate::combat::enemy::{EnemySpell, EnemyTemplate};
    use crate::spells::starting::{minor_heal, singe};
    use rand::rngs::mock::StepRng;

    fn enemy(max_hp: u32, spells: Vec<EnemySpell>) -> Enemy {
        Enemy::from_template(EnemyTemplate {
            id: "TEST".to_string(),
            name: "Test Enemy".to_string(),
            max_hp,
            accuracy: 100,
            dodge: 0,
            armor: 0,
            initial_shield: 0,
            regen_per_second: 0,
            spells,
        })
    }

    fn armed_player() -> Player {
        let mut player = Player::new("Tester");
        player.add_spell(singe());
        player.add_spell(minor_heal());
        player.equip_spell(0, SlotKind::Active, 0).unwrap();
        player.equip_spell(1, SlotKind::Active, 1).unwrap();
        player
    }

    fn run(player: &mut Player, enemy: &mut Enemy, acc: &mut f64, ticks: usize) -> CombatTickResult {
        let mut rng = StepRng::new(0, 0);
        let mut last = CombatTickResult::default();
        for _ in 0..ticks {
            last = combat_tick(player, enemy, acc, 0.1, &mut rng);
            if last.status != EncounterStatus::Ongoing {
                break;
            }
        }
        last
    }

    #[test]
    fn test_dead_side_resolves_immediately() {
        let mut player = armed_player();
        let mut foe = enemy(10, vec![]);
        foe.vitals_mut().current_hp = 0;
        let mut acc = 0.0;
        let result = combat_tick(&mut player, &mut foe, &mut acc, 0.1, &mut StepRng::new(0, 0));
        assert_eq!(result.status, EncounterStatus::PlayerWon);
        assert!(result.events.is_empty());

        player.vitals_mut().current_hp = 0;
        let result = combat_tick(&mut player, &mut foe, &mut acc, 0.1, &mut StepRng::new(0, 0));
        assert_eq!(result.status, EncounterStatus::PlayerLost);
    }

    #[test]
    fn test_singe_fires_after_its_cooldown() {
        let mut player = armed_player();
        let mut foe = enemy(100, vec![]);
        let mut acc = 0.0;
        // 3.5s cooldown: 34 ticks of 0.1s leave it just short
        run(&mut player, &mut foe, &mut acc, 34);
        assert_eq!(foe.current_hp(), 100);
        run(&mut player, &mut foe, &mut acc, 2);
        assert_eq!(foe.current_hp(), 96);
    }

    #[test]
    fn test_player_kill_short_circuits_enemy_casts() {
        let mut player = armed_player();
        player.update_cooldowns(10.0);
        let mut foe = enemy(4, vec![EnemySpell::new("Claw", 5, 0.1)]);
        foe.update_cooldowns(10.0);
        let mut acc = 0.0;

        let result = combat_tick(&mut player, &mut foe, &mut acc, 0.1, &mut StepRng::new(0, 0));
        assert_eq!(result.status, EncounterStatus::PlayerWon);
        assert_eq!(player.current_hp(), 30);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SpellCast { caster: Side::Enemy, .. })));
    }

    #[test]
    fn test_enemy_kill_reports_loss() {
        let mut player = Player::new("Tester");
        player.vitals_mut().current_hp = 3;
        let mut foe = enemy(50, vec![EnemySpell::new("Claw", 5, 1.0)]);
        let mut acc = 0.0;
        let result = run(&mut player, &mut foe, &mut acc, 20);
        assert_eq!(result.status, EncounterStatus::PlayerLost);
        assert_eq!(player.current_hp(), 0);
    }

    #[test]
    fn test_periodic_tick_keeps_overshoot() {
        let mut player = Player::new("Tester");
        let mut foe = enemy(50, vec![]);
        foe.apply_poison_damage_per_second(2);
        let mut acc = 0.95;

        combat_tick(&mut player, &mut foe, &mut acc, 0.1, &mut StepRng::new(0, 0));
        assert_eq!(foe.current_hp(), 48);
        assert!((acc - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_poison_can_win_the_encounter() {
        let mut player = Player::new("Tester");
        let mut foe = enemy(2, vec![]);
        foe.apply_poison_damage_per_second(5);
        let mut acc = 0.0;
        let result = run(&mut player, &mut foe, &mut acc, 10);
        assert_eq!(result.status, EncounterStatus::PlayerWon);
        assert!(result.events.iter().any(|e| matches!(
            e,
            GameEvent::Periodic {
                target: Side::Enemy,
                outcome: PeriodicOutcome::Drained(2),
                ..
            }
        )));
    }
}
