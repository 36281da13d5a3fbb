//! Attribute Point (AP) pricing shared by loot, deconstruction and upgrades.

use super::types::{CoreEffectKind, EnchantmentInstance};
use crate::core::constants::*;

/// AP value of a spell.
///
/// `(base + |core| + sum |enchant|) * multiplier[enchant count]`, rounded and
/// floored at `min_ap`. Kinds without a quantified strength skip the core term.
///
/// The multiplier follows the enchantments actually attached, not the count
/// rolled. With an empty enchantment pool a spell that rolled three
/// enchantments still prices as unenchanted.
pub fn spell_ap_value(
    effect: &CoreEffectKind,
    core_value: f64,
    enchantments: &[EnchantmentInstance],
    min_ap: u32,
) -> u32 {
    let mut sum = GLOBAL_BASE_AP_COST;
    if effect.has_quantified_strength() {
        sum += core_value.abs();
    }
    sum += enchantments.iter().map(|e| e.value.abs()).sum::<f64>();

    let index = enchantments
        .len()
        .min(ENCHANT_COUNT_AP_MULTIPLIERS.len() - 1);
    let ap = round_half_up(sum * ENCHANT_COUNT_AP_MULTIPLIERS[index]).max(0.0);
    (ap as u32).max(min_ap)
}

/// AP needed to raise an attribute from `current` to `current + 1`.
pub fn upgrade_cost(current: u32) -> u32 {
    let p = current as f64;
    let cost = round_half_up(UPGRADE_COST_BASE + UPGRADE_COST_QUADRATIC * p * p + UPGRADE_COST_LINEAR * p);
    (cost.max(0.0) as u32).max(MIN_UPGRADE_COST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryAttribute;
    use crate::spells::types::{DamageType, EnchantEffect, EnchantmentDefinition, HealingType};
    use std::sync::Arc;

    fn enchant(value: f64) -> EnchantmentInstance {
        EnchantmentInstance {
            definition: Arc::new(EnchantmentDefinition {
                id: "ENCH_ADD_MIND".to_string(),
                description_template: "+{value} Mind".to_string(),
                effect: EnchantEffect::PrimaryAttributeFlat {
                    attribute: PrimaryAttribute::Mind,
                },
                base_value: 1.0,
                max_value_at_reference_floor: 20.0,
            }),
            value,
        }
    }

    #[test]
    fn test_starting_spell_values() {
        let fire = CoreEffectKind::Damage {
            damage_type: DamageType::Fire,
        };
        let heal = CoreEffectKind::Healing {
            healing_type: HealingType::PietyHealing,
        };
        assert_eq!(spell_ap_value(&fire, 4.0, &[], FIXED_SPELL_MIN_AP), 9);
        assert_eq!(spell_ap_value(&heal, 2.0, &[], FIXED_SPELL_MIN_AP), 7);
    }

    #[test]
    fn test_enchant_count_multiplier() {
        let shield = CoreEffectKind::ShieldApplication;
        // (5 + 10 + 4 + 6) * 1.5 = 37.5 -> 38
        let value = spell_ap_value(&shield, 10.0, &[enchant(4.0), enchant(6.0)], 5);
        assert_eq!(value, 38);
    }

    #[test]
    fn test_generated_floor_of_five() {
        let shield = CoreEffectKind::ShieldApplication;
        assert_eq!(spell_ap_value(&shield, 0.0, &[], GENERATED_SPELL_MIN_AP), 5);
        assert_eq!(spell_ap_value(&shield, 0.0, &[], FIXED_SPELL_MIN_AP), 5);
    }

    #[test]
    fn test_negative_values_count_by_magnitude() {
        let debuff = CoreEffectKind::DebuffEnemy {
            stat: crate::spells::types::TemporaryStat::Armor,
        };
        assert_eq!(spell_ap_value(&debuff, -3.0, &[enchant(-2.0)], 1), 13);
    }

    #[test]
    fn test_multiplier_index_clamped() {
        let shield = CoreEffectKind::ShieldApplication;
        let many: Vec<_> = (0..6).map(|_| enchant(1.0)).collect();
        // (5 + 0 + 6) * 2.0
        assert_eq!(spell_ap_value(&shield, 0.0, &many, 5), 22);
    }

    #[test]
    fn test_upgrade_cost_curve() {
        assert_eq!(upgrade_cost(0), 10);
        // 10 + 0.5 + 7 = 17.5 -> 18
        assert_eq!(upgrade_cost(1), 18);
        // 10 + 2 + 14
        assert_eq!(upgrade_cost(2), 26);
        // 10 + 50 + 70
        assert_eq!(upgrade_cost(10), 130);
    }
}
