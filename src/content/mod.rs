//! Content catalogue: spell templates, enchantment definitions and the
//! per-floor enemy list.
//!
//! The engine only sees the [`ContentSource`] trait. Two sources ship with
//! the crate: the compiled-in catalogue ([`builtin_content`]) and JSON files
//! ([`ContentCatalog::load_from_file`]).

pub mod data;
pub mod loader;

pub use data::*;

use crate::combat::enemy::{Enemy, EnemyTemplate, MAX_ENEMY_SPELLS};
use crate::core::constants::FIRST_FLOOR;
use crate::error::ContentError;
use crate::spells::generation::{check_enchantment, check_template};
use crate::spells::types::{EnchantmentDefinition, SpellTemplate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only provider of everything the session rolls and fights.
pub trait ContentSource {
    fn spell_templates(&self) -> Vec<Arc<SpellTemplate>>;
    fn enchantments(&self) -> Vec<Arc<EnchantmentDefinition>>;
    /// Fresh enemy for a 1-based floor, `None` beyond the loaded content.
    fn enemy_for_floor(&self, floor: u32) -> Option<Enemy>;
    fn floor_count(&self) -> u32;
}

/// A complete content set. Enemies are ordered by floor, so the enemy for
/// floor `n` is `enemies[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentCatalog {
    pub spell_templates: Vec<Arc<SpellTemplate>>,
    #[serde(default)]
    pub enchantments: Vec<Arc<EnchantmentDefinition>>,
    pub enemies: Vec<EnemyTemplate>,
}

impl ContentCatalog {
    /// Checks the structural rules every content set must satisfy.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.spell_templates.is_empty() {
            return Err(ContentError::Invalid("no spell templates".to_string()));
        }
        for template in &self.spell_templates {
            check_template(template)?;
        }
        for enchant in &self.enchantments {
            check_enchantment(enchant)?;
        }
        for enemy in &self.enemies {
            if enemy.spells.len() > MAX_ENEMY_SPELLS {
                return Err(ContentError::Invalid(format!(
                    "enemy {} has {} spells (max {})",
                    enemy.id,
                    enemy.spells.len(),
                    MAX_ENEMY_SPELLS
                )));
            }
            if enemy.max_hp == 0 {
                return Err(ContentError::Invalid(format!(
                    "enemy {} has no HP",
                    enemy.id
                )));
            }
            if let Some(spell) = enemy.spells.iter().find(|s| s.cooldown_seconds <= 0.0) {
                return Err(ContentError::Invalid(format!(
                    "enemy {} spell {} needs a positive cooldown",
                    enemy.id, spell.name
                )));
            }
        }
        Ok(())
    }
}

impl ContentSource for ContentCatalog {
    fn spell_templates(&self) -> Vec<Arc<SpellTemplate>> {
        self.spell_templates.clone()
    }

    fn enchantments(&self) -> Vec<Arc<EnchantmentDefinition>> {
        self.enchantments.clone()
    }

    fn enemy_for_floor(&self, floor: u32) -> Option<Enemy> {
        if floor < FIRST_FLOOR {
            return None;
        }
        self.enemies
            .get((floor - FIRST_FLOOR) as usize)
            .cloned()
            .map(Enemy::from_template)
    }

    fn floor_count(&self) -> u32 {
        self.enemies.len() as u32
    }
}

impl<C: ContentSource + ?Sized> ContentSource for Box<C> {
    fn spell_templates(&self) -> Vec<Arc<SpellTemplate>> {
        (**self).spell_templates()
    }

    fn enchantments(&self) -> Vec<Arc<EnchantmentDefinition>> {
        (**self).enchantments()
    }

    fn enemy_for_floor(&self, floor: u32) -> Option<Enemy> {
        (**self).enemy_for_floor(floor)
    }

    fn floor_count(&self) -> u32 {
        (**self).floor_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::Combatant;
    use crate::combat::enemy::EnemySpell;

    #[test]
    fn test_enemy_for_floor_is_one_based() {
        let content = builtin_content();
        assert!(content.enemy_for_floor(0).is_none());
        let first = content.enemy_for_floor(1).unwrap();
        assert_eq!(first.id(), content.enemies[0].id);
        assert!(content.enemy_for_floor(content.floor_count() + 1).is_none());
    }

    #[test]
    fn test_enemy_for_floor_returns_fresh_enemy() {
        let content = builtin_content();
        let mut enemy = content.enemy_for_floor(1).unwrap();
        enemy.vitals_mut().current_hp = 1;
        assert_eq!(
            content.enemy_for_floor(1).unwrap().current_hp(),
            content.enemies[0].max_hp
        );
    }

    #[test]
    fn test_validate_rejects_too_many_enemy_spells() {
        let mut content = builtin_content();
        content.enemies[0].spells = vec![
            EnemySpell::new("A", 1, 1.0),
            EnemySpell::new("B", 1, 1.0),
            EnemySpell::new("C", 1, 1.0),
        ];
        assert!(matches!(content.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_templates() {
        let content = ContentCatalog {
            enemies: builtin_content().enemies,
            ..Default::default()
        };
        assert!(content.validate().is_err());
    }
}
