use super::combatant::{tick_cooldown, Combatant, Vitals};
use super::damage::IncomingHit;
use crate::core::constants::{ALWAYS_HIT_ACCURACY, MAX_HIT_CHANCE_VS_ENEMY};
use crate::spells::types::TemporaryStat;
use serde::{Deserialize, Serialize};

pub const MAX_ENEMY_SPELLS: usize = 2;

/// Fixed enemy attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpell {
    pub name: String,
    pub damage: u32,
    pub cooldown_seconds: f64,
    #[serde(default)]
    pub armor_piercing: bool,
    #[serde(default)]
    pub shield_piercing: bool,
    #[serde(default)]
    pub always_hits: bool,
}

impl EnemySpell {
    pub fn new(name: &str, damage: u32, cooldown_seconds: f64) -> Self {
        Self {
            name: name.to_string(),
            damage,
            cooldown_seconds,
            armor_piercing: false,
            shield_piercing: false,
            always_hits: false,
        }
    }

    pub fn armor_piercing(mut self) -> Self {
        self.armor_piercing = true;
        self
    }

    pub fn shield_piercing(mut self) -> Self {
        self.shield_piercing = true;
        self
    }

    /// Builds the hit this spell lands with the caster's current accuracy.
    pub fn to_hit(&self, caster_accuracy: i32) -> IncomingHit {
        IncomingHit {
            raw_damage: self.damage,
            damage_type: None,
            armor_piercing: self.armor_piercing,
            shield_piercing: self.shield_piercing,
            attacker_accuracy: if self.always_hits {
                ALWAYS_HIT_ACCURACY
            } else {
                caster_accuracy
            },
        }
    }
}

/// Content definition of one floor's enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    pub accuracy: i32,
    #[serde(default)]
    pub dodge: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub initial_shield: u32,
    #[serde(default)]
    pub regen_per_second: i32,
    #[serde(default)]
    pub spells: Vec<EnemySpell>,
}

/// Runtime enemy. Stats are stored as current values that temporary deltas
/// move directly; clearing effects restores the template values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub template: EnemyTemplate,
    vitals: Vitals,
    armor: i32,
    dodge: i32,
    accuracy: i32,
    regen_per_second: i32,
    poison_per_second: u32,
    cooldowns: Vec<f64>,
}

impl Enemy {
    pub fn from_template(template: EnemyTemplate) -> Self {
        let cooldowns = template.spells.iter().map(|s| s.cooldown_seconds).collect();
        Self {
            vitals: Vitals {
                current_hp: template.max_hp,
                shield: template.initial_shield,
            },
            armor: template.armor,
            dodge: template.dodge,
            accuracy: template.accuracy,
            regen_per_second: template.regen_per_second,
            poison_per_second: 0,
            cooldowns,
            template,
        }
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn spells(&self) -> &[EnemySpell] {
        &self.template.spells
    }

    pub fn spell(&self, slot: usize) -> Option<&EnemySpell> {
        self.template.spells.get(slot)
    }

    pub fn cooldown_remaining(&self, slot: usize) -> Option<f64> {
        self.cooldowns.get(slot).copied()
    }
}

impl Combatant for Enemy {
    const MAX_HIT_CHANCE: i32 = MAX_HIT_CHANCE_VS_ENEMY;

    fn name(&self) -> &str {
        &self.template.name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn max_hp(&self) -> u32 {
        self.template.max_hp
    }

    fn effective_armor(&self) -> i32 {
        self.armor.max(0)
    }

    fn effective_dodge(&self) -> i32 {
        self.dodge.max(0)
    }

    fn effective_accuracy(&self) -> i32 {
        self.accuracy.max(0)
    }

    fn effective_regen_per_second(&self) -> i32 {
        self.regen_per_second
    }

    fn modify_temporary(&mut self, stat: TemporaryStat, delta: i32) {
        match stat {
            TemporaryStat::Armor => self.armor = self.armor.saturating_add(delta).max(0),
            TemporaryStat::Dodge => self.dodge = self.dodge.saturating_add(delta).max(0),
            TemporaryStat::Accuracy => self.accuracy = self.accuracy.saturating_add(delta),
            TemporaryStat::RegenPerSecond => {
                self.regen_per_second = self.regen_per_second.saturating_add(delta)
            }
        }
    }

    fn poison_per_second(&self) -> u32 {
        self.poison_per_second
    }

    fn set_poison_per_second(&mut self, value: u32) {
        self.poison_per_second = value;
    }

    fn clear_temporary_effects_and_poison(&mut self) {
        self.armor = self.template.armor;
        self.dodge = self.template.dodge;
        self.accuracy = self.template.accuracy;
        self.regen_per_second = self.template.regen_per_second;
        self.poison_per_second = 0;
    }

    fn reset_combat_state(&mut self) {
        self.vitals = Vitals {
            current_hp: self.template.max_hp,
            shield: self.template.initial_shield,
        };
        self.clear_temporary_effects_and_poison();
        for (remaining, spell) in self.cooldowns.iter_mut().zip(&self.template.spells) {
            *remaining = spell.cooldown_seconds;
        }
    }

    fn update_cooldowns(&mut self, delta_seconds: f64) {
        for remaining in &mut self.cooldowns {
            tick_cooldown(remaining, delta_seconds);
        }
    }

    fn ready_spells(&self) -> Vec<usize> {
        self.cooldowns
            .iter()
            .enumerate()
            .filter(|(_, remaining)| **remaining <= 0.0)
            .map(|(slot, _)| slot)
            .collect()
    }

    fn trigger_cooldown(&mut self, slot: usize) {
        if let (Some(remaining), Some(spell)) =
            (self.cooldowns.get_mut(slot), self.template.spells.get(slot))
        {
            *remaining = spell.cooldown_seconds;
        }
    }
}
