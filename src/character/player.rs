use super::attributes::{Attributes, PrimaryAttribute};
use super::derived_stats::DerivedStats;
use super::inventory::{Inventory, SpellId};
use super::loadout::{Loadout, SlotKind};
use crate::combat::combatant::{Combatant, TemporaryModifiers, Vitals};
use crate::core::constants::*;
use crate::error::CommandError;
use crate::spells::types::{
    DamageType, EnchantEffect, FlatPlayerStat, HealingType, PercentPlayerStat, SpellInstance,
    TemporaryStat,
};
use crate::spells::valuation::upgrade_cost;
use serde::{Deserialize, Serialize};

/// The player-controlled sorcerer.
///
/// Effective stats are recomputed on every query from the purchased
/// attributes, the enchantments of equipped spells and the temporary deltas,
/// so the only stored combat state is the pools, deltas and cooldowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    attributes: Attributes,
    attribute_points: u32,
    inventory: Inventory,
    loadout: Loadout,
    vitals: Vitals,
    temporary: TemporaryModifiers,
    poison_per_second: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        let mut player = Self {
            name: name.into(),
            attributes: Attributes::new(),
            attribute_points: 0,
            inventory: Inventory::new(),
            loadout: Loadout::new(),
            vitals: Vitals::default(),
            temporary: TemporaryModifiers::default(),
            poison_per_second: 0,
        };
        player.vitals.current_hp = player.max_hp();
        player
    }

    /// Purchased attribute scores, without enchantment bonuses.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute_points(&self) -> u32 {
        self.attribute_points
    }

    pub fn grant_attribute_points(&mut self, amount: u32) {
        self.attribute_points = self.attribute_points.saturating_add(amount);
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn temporary(&self) -> &TemporaryModifiers {
        &self.temporary
    }

    pub fn equipped_spells(&self) -> impl Iterator<Item = &SpellInstance> + '_ {
        self.loadout
            .equipped()
            .filter_map(|id| self.inventory.get_by_id(id))
    }

    pub fn active_spell(&self, slot: usize) -> Option<&SpellInstance> {
        self.loadout
            .active(slot)
            .and_then(|s| self.inventory.get_by_id(s.spell))
    }

    /// Sum of an enchantment effect across every equipped spell.
    pub fn enchant_total(&self, effect: EnchantEffect) -> f64 {
        self.equipped_spells()
            .flat_map(|spell| spell.enchantments_with(effect))
            .map(|e| e.value)
            .sum()
    }

    /// Purchased scores plus flat attribute enchantments.
    pub fn effective_attributes(&self) -> Attributes {
        let mut total = self.attributes;
        let mut bonus = Attributes::new();
        for attr in PrimaryAttribute::all() {
            let value = self.enchant_total(EnchantEffect::PrimaryAttributeFlat { attribute: attr });
            bonus.set(attr, round_half_up(value).max(0.0) as u32);
        }
        total.add(&bonus);
        total
    }

    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats::from_attributes(&self.effective_attributes())
    }

    /// Sum of equipped damage-type percent enchantments.
    pub fn global_damage_bonus_percent(&self, damage_type: DamageType) -> f64 {
        self.enchant_total(EnchantEffect::DamageTypePercent { damage_type })
    }

    pub fn global_healing_bonus_percent(&self, healing_type: HealingType) -> f64 {
        self.enchant_total(EnchantEffect::HealingTypePercent { healing_type })
    }

    fn flat_enchant(&self, stat: FlatPlayerStat) -> f64 {
        self.enchant_total(EnchantEffect::PlayerStatFlat { stat })
    }

    fn percent_enchant(&self, stat: PercentPlayerStat) -> f64 {
        self.enchant_total(EnchantEffect::PlayerStatPercent { stat })
    }

    fn clamp_hp_to_max(&mut self) {
        let max_hp = self.max_hp();
        self.vitals.current_hp = self.vitals.current_hp.min(max_hp);
    }

    // --- Player management ---

    pub fn add_spell(&mut self, spell: SpellInstance) -> SpellId {
        self.inventory.add(spell)
    }

    /// Equips the inventory spell at `inventory_index`. The previous occupant
    /// of the slot is unequipped and returned.
    pub fn equip_spell(
        &mut self,
        inventory_index: usize,
        kind: SlotKind,
        slot: usize,
    ) -> Result<Option<SpellId>, CommandError> {
        let entry = self.inventory.get(inventory_index).ok_or(
            CommandError::InvalidInventoryIndex {
                index: inventory_index,
                len: self.inventory.len(),
            },
        )?;
        if slot >= kind.capacity() {
            return Err(CommandError::InvalidSlot {
                kind: kind.name(),
                index: slot,
            });
        }
        if self.loadout.contains(entry.id) {
            return Err(CommandError::AlreadyEquipped {
                name: entry.spell.name().to_string(),
            });
        }

        let (id, cooldown) = (entry.id, entry.spell.cooldown_seconds);
        let displaced = self.loadout.equip(kind, slot, id, cooldown)?;
        self.clamp_hp_to_max();
        Ok(displaced)
    }

    pub fn unequip_spell(&mut self, kind: SlotKind, slot: usize) -> Result<SpellId, CommandError> {
        let removed = self.loadout.unequip(kind, slot)?;
        self.clamp_hp_to_max();
        Ok(removed)
    }

    /// Destroys an unequipped spell for its AP value. Returns the AP gained.
    pub fn deconstruct_spell(&mut self, inventory_index: usize) -> Result<u32, CommandError> {
        let entry = self.inventory.get(inventory_index).ok_or(
            CommandError::InvalidInventoryIndex {
                index: inventory_index,
                len: self.inventory.len(),
            },
        )?;
        if self.loadout.contains(entry.id) {
            return Err(CommandError::SpellEquipped {
                name: entry.spell.name().to_string(),
            });
        }
        let gained = entry.spell.ap_value;
        self.inventory.remove(inventory_index);
        self.attribute_points = self.attribute_points.saturating_add(gained);
        Ok(gained)
    }

    /// Cost of the next point, based on the purchased score only.
    pub fn upgrade_cost(&self, attr: PrimaryAttribute) -> u32 {
        upgrade_cost(self.attributes.get(attr))
    }

    /// Buys one point of `attr`. Returns the AP spent.
    pub fn upgrade_attribute(&mut self, attr: PrimaryAttribute) -> Result<u32, CommandError> {
        let cost = self.upgrade_cost(attr);
        if self.attribute_points < cost {
            return Err(CommandError::InsufficientAp {
                cost,
                available: self.attribute_points,
            });
        }
        self.attribute_points -= cost;
        self.attributes.increment(attr);
        self.clamp_hp_to_max();
        Ok(cost)
    }

    pub fn sort_inventory_by_ap_value(&mut self) {
        self.inventory.sort_by_ap_value();
    }
}

impl Combatant for Player {
    const MAX_HIT_CHANCE: i32 = MAX_HIT_CHANCE_VS_PLAYER;

    fn name(&self) -> &str {
        &self.name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn max_hp(&self) -> u32 {
        let stats = self.derived_stats();
        let hp = (BASE_PLAYER_HP + stats.flat_hp_bonus)
            * (1.0 + stats.max_health_bonus_percent / 100.0)
            + self.flat_enchant(FlatPlayerStat::MaxHp);
        round_half_up(hp).max(1.0) as u32
    }

    fn effective_armor(&self) -> i32 {
        let armor = round_half_up(self.flat_enchant(FlatPlayerStat::Armor)) as i32;
        armor.saturating_add(self.temporary.armor).max(0)
    }

    fn effective_dodge(&self) -> i32 {
        let stats = self.derived_stats();
        let dodge = round_half_up(stats.dodge_percent) as i32
            + round_half_up(self.percent_enchant(PercentPlayerStat::DodgeChance)) as i32;
        dodge.saturating_add(self.temporary.dodge).max(0)
    }

    fn effective_accuracy(&self) -> i32 {
        let stats = self.derived_stats();
        let base = round_half_up(stats.accuracy_percent);
        let bonus = self.percent_enchant(PercentPlayerStat::GlobalAccuracy);
        let accuracy = round_half_up(base * (1.0 + bonus / 100.0)) as i32;
        accuracy.saturating_add(self.temporary.accuracy).max(0)
    }

    fn effective_regen_per_second(&self) -> i32 {
        let regen = round_half_up(self.flat_enchant(FlatPlayerStat::RegenPerSecond)) as i32;
        regen.saturating_add(self.temporary.regen_per_second)
    }

    /// Deltas accumulate unclamped; the effective-stat queries clamp.
    fn modify_temporary(&mut self, stat: TemporaryStat, delta: i32) {
        self.temporary.add(stat, delta);
    }

    fn poison_per_second(&self) -> u32 {
        self.poison_per_second
    }

    fn set_poison_per_second(&mut self, value: u32) {
        self.poison_per_second = value;
    }

    fn clear_temporary_effects_and_poison(&mut self) {
        self.temporary = TemporaryModifiers::default();
        self.poison_per_second = 0;
    }

    fn reset_combat_state(&mut self) {
        self.clear_temporary_effects_and_poison();
        self.vitals = Vitals {
            current_hp: self.max_hp(),
            shield: 0,
        };
        self.loadout.reset_cooldowns();
    }

    fn update_cooldowns(&mut self, delta_seconds: f64) {
        self.loadout.update_cooldowns(delta_seconds);
    }

    fn ready_spells(&self) -> Vec<usize> {
        self.loadout.ready_slots()
    }

    fn trigger_cooldown(&mut self, slot: usize) {
        self.loadout.trigger_cooldown(slot);
    }
}
