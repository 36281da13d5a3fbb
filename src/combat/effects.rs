//! Turns a cast spell into calls against the damage pipeline and the
//! combatant mutators.
//!
//! Player casts are resolved in two phases: [`resolve_player_cast`] reads the
//! caster and computes accuracy and potency, then [`apply_player_cast`]
//! mutates caster and target. The split keeps the spell borrowed from the
//! inventory only while nothing is being mutated.

use super::combatant::Combatant;
use super::damage::{DamageOutcome, IncomingHit};
use super::enemy::EnemySpell;
use crate::character::player::Player;
use crate::core::constants::{round_half_up, ALWAYS_HIT_ACCURACY};
use crate::core::events::{GameEvent, Side};
use crate::spells::types::{CoreEffectKind, EnchantEffect, OnHitEffect, SpellInstance};
use rand::Rng;
use tracing::trace;

/// Everything needed to apply one player cast.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCast {
    pub spell: String,
    pub effect: CoreEffectKind,
    /// Rounded, non-negative potency before the shield doubling.
    pub potency: u32,
    pub accuracy: i32,
    pub armor_piercing: bool,
    pub shield_piercing: bool,
    pub double_damage_to_shields: bool,
    pub on_hit: Option<OnHitEffect>,
}

impl ResolvedCast {
    /// Potency as a stat delta, saturating at `i32::MAX`.
    pub fn signed_potency(&self) -> i32 {
        i32::try_from(self.potency).unwrap_or(i32::MAX)
    }
}

/// Caster accuracy for this spell: base, plus a positive template bonus, plus
/// this-spell accuracy enchantments. Always-hit spells use the unreachable value.
pub fn spell_accuracy(player: &Player, spell: &SpellInstance) -> i32 {
    let inherent = &spell.template.inherent;
    if inherent.always_hits {
        return ALWAYS_HIT_ACCURACY;
    }
    let mut accuracy = player.effective_accuracy();
    if inherent.accuracy_bonus > 0 {
        accuracy = accuracy.saturating_add(inherent.accuracy_bonus);
    }
    for enchant in spell.enchantments_with(EnchantEffect::SpellAccuracyFlat) {
        accuracy = accuracy.saturating_add(round_half_up(enchant.value) as i32);
    }
    accuracy
}

/// Unrounded potency after every bonus layer.
///
/// Order: attribute bonus (only for spells with a scaling attribute), global
/// typed enchantments, then this-spell potency enchantments in order.
pub fn spell_potency(player: &Player, spell: &SpellInstance) -> f64 {
    let mut potency = spell.core_value;

    if spell.scaling_attribute().is_some() {
        let stats = player.derived_stats();
        let bonus = match spell.effect() {
            CoreEffectKind::Damage { damage_type } => stats.damage_bonus_percent(*damage_type),
            CoreEffectKind::Healing { healing_type } => stats.healing_bonus_percent(*healing_type),
            _ => 0.0,
        };
        potency *= 1.0 + bonus / 100.0;
    }

    let global = match spell.effect() {
        CoreEffectKind::Damage { damage_type } => player.global_damage_bonus_percent(*damage_type),
        CoreEffectKind::Healing { healing_type } => {
            player.global_healing_bonus_percent(*healing_type)
        }
        _ => 0.0,
    };
    potency *= 1.0 + global / 100.0;

    for enchant in &spell.enchantments {
        match enchant.effect() {
            EnchantEffect::SpellPotencyFlat => potency += enchant.value,
            EnchantEffect::SpellPotencyPercent => potency *= 1.0 + enchant.value / 100.0,
            _ => {}
        }
    }

    potency
}

pub fn resolve_player_cast(player: &Player, spell: &SpellInstance) -> ResolvedCast {
    let inherent = &spell.template.inherent;
    let potency = round_half_up(spell_potency(player, spell).max(0.0));
    ResolvedCast {
        spell: spell.name().to_string(),
        effect: spell.effect().clone(),
        potency: potency.min(u32::MAX as f64) as u32,
        accuracy: spell_accuracy(player, spell),
        armor_piercing: inherent.armor_piercing,
        shield_piercing: inherent.shield_piercing,
        double_damage_to_shields: inherent.double_damage_to_shields,
        on_hit: inherent.on_hit,
    }
}

/// Applies a resolved cast. Healing, shields and buffs go to the caster;
/// damage, poison and debuffs go to the target.
pub fn apply_player_cast<T: Combatant>(
    cast: &ResolvedCast,
    player: &mut Player,
    target: &mut T,
    target_side: Side,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    match &cast.effect {
        CoreEffectKind::Damage { damage_type } => {
            let mut damage = cast.potency;
            if cast.double_damage_to_shields && target.current_shield() > 0 {
                damage = damage.saturating_mul(2);
                events.push(GameEvent::DoubledAgainstShield {
                    spell: cast.spell.clone(),
                    damage,
                });
            }
            let hit = IncomingHit {
                raw_damage: damage,
                damage_type: Some(*damage_type),
                armor_piercing: cast.armor_piercing,
                shield_piercing: cast.shield_piercing,
                attacker_accuracy: cast.accuracy,
            };
            let outcome = target.take_damage(&hit, rng);
            push_damage_event(&cast.spell, &hit, outcome, target, target_side, events);

            if target.is_alive() {
                if let Some(on_hit) = &cast.on_hit {
                    apply_on_hit(on_hit, target, target_side, events);
                }
            }
        }
        CoreEffectKind::Healing { .. } => {
            let healed = player.apply_healing(cast.potency);
            events.push(GameEvent::Healed {
                target: Side::Player,
                amount: healed,
                hp_after: player.current_hp(),
            });
        }
        CoreEffectKind::ShieldApplication => {
            let gained = player.apply_shield(cast.potency);
            events.push(GameEvent::ShieldGained {
                target: Side::Player,
                amount: gained,
                shield_after: player.current_shield(),
            });
        }
        CoreEffectKind::ApplyDot { dot_type, .. } => {
            target.apply_poison_damage_per_second(cast.signed_potency());
            events.push(GameEvent::PoisonApplied {
                target: target_side,
                label: dot_type.clone(),
                amount: cast.potency,
                poison_per_second: target.poison_per_second(),
            });
        }
        CoreEffectKind::BuffPlayer { stat } => {
            let delta = cast.signed_potency();
            player.modify_temporary(*stat, delta);
            events.push(GameEvent::StatModified {
                target: Side::Player,
                stat: *stat,
                delta,
            });
        }
        CoreEffectKind::DebuffEnemy { stat } => {
            let delta = -cast.signed_potency();
            target.modify_temporary(*stat, delta);
            events.push(GameEvent::StatModified {
                target: target_side,
                stat: *stat,
                delta,
            });
        }
    }
}

/// Secondary effect of a damaging spell on a surviving target.
pub fn apply_on_hit<T: Combatant>(
    on_hit: &OnHitEffect,
    target: &mut T,
    target_side: Side,
    events: &mut Vec<GameEvent>,
) {
    match *on_hit {
        OnHitEffect::StatReduction { stat, magnitude } => {
            trace!(target = target.name(), ?stat, magnitude, "on-hit reduction");
            target.modify_temporary(stat, -magnitude);
            events.push(GameEvent::StatModified {
                target: target_side,
                stat,
                delta: -magnitude,
            });
        }
    }
}

/// Enemy attacks are untyped and use the caster's current accuracy.
pub fn apply_enemy_spell<C: Combatant, T: Combatant>(
    spell: &EnemySpell,
    caster: &C,
    target: &mut T,
    target_side: Side,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let hit = spell.to_hit(caster.effective_accuracy());
    let outcome = target.take_damage(&hit, rng);
    push_damage_event(&spell.name, &hit, outcome, target, target_side, events);
}

fn push_damage_event<T: Combatant>(
    spell: &str,
    hit: &IncomingHit,
    outcome: DamageOutcome,
    target: &T,
    target_side: Side,
    events: &mut Vec<GameEvent>,
) {
    match outcome {
        DamageOutcome::Hit {
            mitigated,
            absorbed_by_shield,
            to_hp,
        } => events.push(GameEvent::Hit {
            target: target_side,
            spell: spell.to_string(),
            raw_damage: hit.raw_damage,
            mitigated,
            absorbed_by_shield,
            to_hp,
            hp_after: target.current_hp(),
            shield_after: target.current_shield(),
        }),
        DamageOutcome::Dodged { hit_chance, .. } => events.push(GameEvent::Dodged {
            target: target_side,
            spell: spell.to_string(),
            hit_chance,
        }),
        DamageOutcome::TargetDead => {}
    }
}
