use super::types::{
    CooldownRange, EnchantmentDefinition, EnchantmentInstance, SpellInstance, SpellTemplate,
};
use super::valuation::spell_ap_value;
use crate::core::constants::*;
use crate::error::ContentError;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Rolls loot spells from a fixed pool of templates and enchantments.
#[derive(Debug, Clone)]
pub struct SpellGenerator {
    templates: Vec<Arc<SpellTemplate>>,
    enchantments: Vec<Arc<EnchantmentDefinition>>,
}

impl SpellGenerator {
    /// Fails when there are no templates to roll from, or when a template or
    /// enchantment carries bounds it could never roll inside. An empty
    /// enchantment pool is allowed; spells then never carry enchantments.
    pub fn new(
        templates: Vec<Arc<SpellTemplate>>,
        enchantments: Vec<Arc<EnchantmentDefinition>>,
    ) -> Result<Self, ContentError> {
        if templates.is_empty() {
            return Err(ContentError::Invalid(
                "spell generator needs at least one template".to_string(),
            ));
        }
        for template in &templates {
            check_template(template)?;
        }
        for enchant in &enchantments {
            check_enchantment(enchant)?;
        }
        Ok(Self {
            templates,
            enchantments,
        })
    }

    pub fn templates(&self) -> &[Arc<SpellTemplate>] {
        &self.templates
    }

    pub fn enchantments(&self) -> &[Arc<EnchantmentDefinition>] {
        &self.enchantments
    }

    /// Generate a loot spell for the given floor (floors below 1 count as 1).
    pub fn generate(&self, floor: u32, rng: &mut impl Rng) -> SpellInstance {
        let floor = floor.max(FIRST_FLOOR);

        let template = Arc::clone(&self.templates[rng.gen_range(0..self.templates.len())]);
        let cooldown_seconds = roll_cooldown(&template.cooldown, rng);

        let power = rng.gen_range(1..=floor);
        let core_value = template.core_effect.base_value * power as f64;

        let enchant_count = rng.gen_range(0..=MAX_ENCHANTS_PER_SPELL);
        let mut enchantments = Vec::with_capacity(enchant_count);
        if !self.enchantments.is_empty() {
            for _ in 0..enchant_count {
                let definition =
                    Arc::clone(&self.enchantments[rng.gen_range(0..self.enchantments.len())]);
                let multiplier = rng.gen_range(1..=floor);
                let value = enchant_value(&definition, multiplier);
                enchantments.push(EnchantmentInstance { definition, value });
            }
        }

        let ap_value = spell_ap_value(
            &template.core_effect.effect,
            core_value,
            &enchantments,
            GENERATED_SPELL_MIN_AP,
        );

        debug!(
            spell = %template.name,
            floor,
            power,
            enchants = enchantments.len(),
            ap = ap_value,
            "generated spell"
        );

        SpellInstance {
            template,
            cooldown_seconds,
            core_value,
            enchantments,
            ap_value,
        }
    }
}

pub(crate) fn check_template(template: &SpellTemplate) -> Result<(), ContentError> {
    let range = &template.cooldown;
    if !range.min.is_finite() || !range.max.is_finite() || range.min < 0.0 || range.min > range.max
    {
        return Err(ContentError::Invalid(format!(
            "spell template {} has cooldown range {}..{}",
            template.id, range.min, range.max
        )));
    }
    if !template.core_effect.base_value.is_finite() {
        return Err(ContentError::Invalid(format!(
            "spell template {} has core value {}",
            template.id, template.core_effect.base_value
        )));
    }
    Ok(())
}

pub(crate) fn check_enchantment(enchant: &EnchantmentDefinition) -> Result<(), ContentError> {
    let (base, max) = (enchant.base_value, enchant.max_value_at_reference_floor);
    if !base.is_finite() || !max.is_finite() || base > max {
        return Err(ContentError::Invalid(format!(
            "enchantment {} has base {} above max {}",
            enchant.id, base, max
        )));
    }
    Ok(())
}

/// Uniform cooldown in the template range, rounded half-up to 0.1s and kept
/// inside the range.
///
/// Rounding works on the binary value, so a roll sitting exactly on a
/// printed `x.x5` boundary may round down where decimal rounding would go up.
/// An inverted range yields `range.max`.
pub fn roll_cooldown(range: &CooldownRange, rng: &mut impl Rng) -> f64 {
    let raw = range.min + (range.max - range.min) * rng.gen::<f64>();
    let rounded = round_half_up(raw * 10.0) / 10.0;
    rounded.max(range.min).min(range.max)
}

/// `base + round((max - base) / 50 * multiplier)`, clamped to `[base, max]`.
pub fn enchant_value(definition: &EnchantmentDefinition, multiplier: u32) -> f64 {
    let base = definition.base_value;
    let max = definition.max_value_at_reference_floor;
    let step = (max - base) / ENCHANT_REFERENCE_FLOOR;
    let value = base + round_half_up(step * multiplier as f64);
    value.min(max).max(base)
}
