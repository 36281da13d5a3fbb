//! Uniform contract shared by the player and enemies.

use super::damage::{resolve_hit, DamageOutcome, DefenseProfile, IncomingHit};
use crate::spells::types::TemporaryStat;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// HP and shield pools. Max HP lives on the combatant since the player's is
/// derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub current_hp: u32,
    pub shield: u32,
}

/// Additive in-combat stat deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryModifiers {
    pub armor: i32,
    pub dodge: i32,
    pub accuracy: i32,
    pub regen_per_second: i32,
}

impl TemporaryModifiers {
    pub fn get(&self, stat: TemporaryStat) -> i32 {
        match stat {
            TemporaryStat::Armor => self.armor,
            TemporaryStat::Dodge => self.dodge,
            TemporaryStat::Accuracy => self.accuracy,
            TemporaryStat::RegenPerSecond => self.regen_per_second,
        }
    }

    pub fn add(&mut self, stat: TemporaryStat, delta: i32) {
        let slot = match stat {
            TemporaryStat::Armor => &mut self.armor,
            TemporaryStat::Dodge => &mut self.dodge,
            TemporaryStat::Accuracy => &mut self.accuracy,
            TemporaryStat::RegenPerSecond => &mut self.regen_per_second,
        };
        *slot = slot.saturating_add(delta);
    }
}

/// Result of one end-of-second regen/poison resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodicOutcome {
    Healed(u32),
    /// HP lost to poison; armor and shield are bypassed.
    Drained(u32),
    Unchanged,
}

/// Capabilities every combat participant exposes.
///
/// The damage pipeline and the tick scheduler are written against this trait
/// only. Pool mutators (`take_damage`, healing, shield, periodic effects) are
/// provided; variants supply stats, temporary-delta storage and cooldowns.
pub trait Combatant {
    /// Hit-chance ceiling when this combatant is the target.
    const MAX_HIT_CHANCE: i32;

    fn name(&self) -> &str;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;
    fn max_hp(&self) -> u32;

    fn effective_armor(&self) -> i32;
    fn effective_dodge(&self) -> i32;
    fn effective_accuracy(&self) -> i32;
    /// May be negative.
    fn effective_regen_per_second(&self) -> i32;

    /// Applies a temporary delta. Variants decide where it is clamped.
    fn modify_temporary(&mut self, stat: TemporaryStat, delta: i32);

    fn poison_per_second(&self) -> u32;
    fn set_poison_per_second(&mut self, value: u32);

    /// Drops temporary deltas and poison.
    fn clear_temporary_effects_and_poison(&mut self);

    /// Full HP, starting shield, no temporaries, every spell on full cooldown.
    fn reset_combat_state(&mut self);

    fn update_cooldowns(&mut self, delta_seconds: f64);
    /// Slot indices of spells whose cooldown reached zero, in cast order.
    fn ready_spells(&self) -> Vec<usize>;
    fn trigger_cooldown(&mut self, slot: usize);

    fn current_hp(&self) -> u32 {
        self.vitals().current_hp
    }

    fn current_shield(&self) -> u32 {
        self.vitals().shield
    }

    fn is_alive(&self) -> bool {
        self.current_hp() > 0
    }

    fn defense_profile(&self) -> DefenseProfile {
        DefenseProfile {
            dodge: self.effective_dodge(),
            armor: self.effective_armor(),
            shield: self.current_shield(),
            max_hit_chance: Self::MAX_HIT_CHANCE,
        }
    }

    /// Dodge, armor, shield, then HP. No-op on a dead target.
    fn take_damage(&mut self, hit: &IncomingHit, rng: &mut impl Rng) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::TargetDead;
        }
        let outcome = resolve_hit(hit, &self.defense_profile(), rng);
        if let DamageOutcome::Hit {
            absorbed_by_shield,
            to_hp,
            ..
        } = outcome
        {
            let vitals = self.vitals_mut();
            vitals.shield = vitals.shield.saturating_sub(absorbed_by_shield);
            vitals.current_hp = vitals.current_hp.saturating_sub(to_hp);
        }
        outcome
    }

    /// Returns the HP actually restored. Never lowers HP.
    fn apply_healing(&mut self, amount: u32) -> u32 {
        if !self.is_alive() || amount == 0 {
            return 0;
        }
        let max_hp = self.max_hp();
        let vitals = self.vitals_mut();
        let before = vitals.current_hp;
        let healed = before.saturating_add(amount).min(max_hp);
        vitals.current_hp = healed.max(before);
        vitals.current_hp - before
    }

    /// Shield has no upper bound.
    fn apply_shield(&mut self, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let vitals = self.vitals_mut();
        vitals.shield = vitals.shield.saturating_add(amount);
        amount
    }

    fn modify_temporary_armor(&mut self, delta: i32) {
        self.modify_temporary(TemporaryStat::Armor, delta);
    }

    fn modify_temporary_dodge(&mut self, delta: i32) {
        self.modify_temporary(TemporaryStat::Dodge, delta);
    }

    fn modify_temporary_accuracy(&mut self, delta: i32) {
        self.modify_temporary(TemporaryStat::Accuracy, delta);
    }

    fn modify_temporary_regen_per_second(&mut self, delta: i32) {
        self.modify_temporary(TemporaryStat::RegenPerSecond, delta);
    }

    /// Additive, floored at zero.
    fn apply_poison_damage_per_second(&mut self, delta: i32) {
        let next = (self.poison_per_second() as i64 + delta as i64).max(0);
        self.set_poison_per_second(next.min(u32::MAX as i64) as u32);
    }

    /// Net regen minus poison. Positive heals, negative drains HP directly.
    fn apply_periodic_effects(&mut self) -> PeriodicOutcome {
        if !self.is_alive() {
            return PeriodicOutcome::Unchanged;
        }
        let net = self.effective_regen_per_second() as i64 - self.poison_per_second() as i64;
        if net > 0 {
            let healed = self.apply_healing(net.min(u32::MAX as i64) as u32);
            if healed > 0 {
                PeriodicOutcome::Healed(healed)
            } else {
                PeriodicOutcome::Unchanged
            }
        } else if net < 0 {
            let drain = (-net).min(u32::MAX as i64) as u32;
            let vitals = self.vitals_mut();
            let before = vitals.current_hp;
            vitals.current_hp = before.saturating_sub(drain);
            PeriodicOutcome::Drained(before - vitals.current_hp)
        } else {
            PeriodicOutcome::Unchanged
        }
    }
}

/// Steps a cooldown down, floored at zero.
pub fn tick_cooldown(remaining: &mut f64, delta_seconds: f64) {
    *remaining = (*remaining - delta_seconds).max(0.0);
}
