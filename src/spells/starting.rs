//! Fixed spells every new player begins with.

use super::types::{
    CooldownRange, CoreEffect, CoreEffectKind, DamageType, HealingType, InherentProperties,
    SpellInstance, SpellTemplate,
};
use super::valuation::spell_ap_value;
use crate::character::attributes::PrimaryAttribute;
use crate::core::constants::FIXED_SPELL_MIN_AP;
use std::sync::Arc;

/// Builds a non-rolled spell with no enchantments, priced with the fixed-spell floor.
pub fn fixed_spell(template: SpellTemplate, cooldown_seconds: f64, core_value: f64) -> SpellInstance {
    let ap_value = spell_ap_value(&template.core_effect.effect, core_value, &[], FIXED_SPELL_MIN_AP);
    SpellInstance {
        template: Arc::new(template),
        cooldown_seconds,
        core_value,
        enchantments: Vec::new(),
        ap_value,
    }
}

pub fn singe() -> SpellInstance {
    let template = SpellTemplate {
        id: "START_SINGE".to_string(),
        name: "Singe".to_string(),
        scaling_attribute: Some(PrimaryAttribute::Intellect),
        core_effect: CoreEffect {
            base_value: 3.0,
            effect: CoreEffectKind::Damage {
                damage_type: DamageType::Fire,
            },
        },
        cooldown: CooldownRange::new(3.0, 4.0),
        inherent: InherentProperties::default(),
    };
    fixed_spell(template, 3.5, 4.0)
}

pub fn minor_heal() -> SpellInstance {
    let template = SpellTemplate {
        id: "START_MINOR_HEAL".to_string(),
        name: "Minor Heal".to_string(),
        scaling_attribute: Some(PrimaryAttribute::Piety),
        core_effect: CoreEffect {
            base_value: 2.0,
            effect: CoreEffectKind::Healing {
                healing_type: HealingType::PietyHealing,
            },
        },
        cooldown: CooldownRange::new(3.5, 4.5),
        inherent: InherentProperties::default(),
    };
    fixed_spell(template, 4.0, 2.0)
}

/// Starting spells in active-slot order.
pub fn starting_spells() -> Vec<SpellInstance> {
    vec![singe(), minor_heal()]
}
