//! Read-only views of the combatants for display and `--json` output.

use crate::character::attributes::PrimaryAttribute;
use crate::character::inventory::SpellId;
use crate::character::loadout::SlotKind;
use crate::character::player::Player;
use crate::combat::combatant::Combatant;
use crate::combat::enemy::Enemy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeLine {
    pub attribute: PrimaryAttribute,
    /// Purchased score
    pub base: u32,
    /// Score including equipped attribute enchantments
    pub effective: u32,
    pub upgrade_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLine {
    pub index: usize,
    pub id: SpellId,
    pub name: String,
    pub ap_value: u32,
    pub cooldown_seconds: f64,
    pub enchantments: usize,
    pub equipped: Option<(SlotKind, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSlotLine {
    pub spell: String,
    pub cooldown_remaining: f64,
    pub cooldown_full: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub armor: i32,
    pub dodge: i32,
    pub accuracy: i32,
    pub regen_per_second: i32,
    pub poison_per_second: u32,
    pub attribute_points: u32,
    pub attributes: Vec<AttributeLine>,
    pub active_slots: Vec<Option<ActiveSlotLine>>,
    pub passive_slots: Vec<Option<String>>,
    pub inventory: Vec<InventoryLine>,
}

impl PlayerSnapshot {
    pub fn capture(player: &Player) -> Self {
        let effective = player.effective_attributes();
        let attributes = PrimaryAttribute::all()
            .into_iter()
            .map(|attribute| AttributeLine {
                attribute,
                base: player.attributes().get(attribute),
                effective: effective.get(attribute),
                upgrade_cost: player.upgrade_cost(attribute),
            })
            .collect();

        let spell_name = |id: SpellId| {
            player
                .inventory()
                .get_by_id(id)
                .map(|s| s.name().to_string())
                .unwrap_or_default()
        };
        let loadout = player.loadout();
        let active_slots = (0..SlotKind::Active.capacity())
            .map(|i| {
                loadout.active(i).map(|slot| ActiveSlotLine {
                    spell: spell_name(slot.spell),
                    cooldown_remaining: slot.remaining,
                    cooldown_full: slot.full_cooldown,
                })
            })
            .collect();
        let passive_slots = (0..SlotKind::Passive.capacity())
            .map(|i| loadout.passive(i).map(spell_name))
            .collect();

        let inventory = player
            .inventory()
            .iter()
            .enumerate()
            .map(|(index, entry)| InventoryLine {
                index,
                id: entry.id,
                name: entry.spell.name().to_string(),
                ap_value: entry.spell.ap_value,
                cooldown_seconds: entry.spell.cooldown_seconds,
                enchantments: entry.spell.enchantments.len(),
                equipped: loadout.slot_of(entry.id),
            })
            .collect();

        Self {
            name: player.name.clone(),
            hp: player.current_hp(),
            max_hp: player.max_hp(),
            shield: player.current_shield(),
            armor: player.effective_armor(),
            dodge: player.effective_dodge(),
            accuracy: player.effective_accuracy(),
            regen_per_second: player.effective_regen_per_second(),
            poison_per_second: player.poison_per_second(),
            attribute_points: player.attribute_points(),
            attributes,
            active_slots,
            passive_slots,
            inventory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySpellLine {
    pub name: String,
    pub damage: u32,
    pub cooldown_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySnapshot {
    pub id: String,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub armor: i32,
    pub dodge: i32,
    pub accuracy: i32,
    pub regen_per_second: i32,
    pub poison_per_second: u32,
    pub spells: Vec<EnemySpellLine>,
}

impl EnemySnapshot {
    pub fn capture(enemy: &Enemy) -> Self {
        let spells = enemy
            .spells()
            .iter()
            .enumerate()
            .map(|(slot, spell)| EnemySpellLine {
                name: spell.name.clone(),
                damage: spell.damage,
                cooldown_remaining: enemy.cooldown_remaining(slot).unwrap_or(0.0),
            })
            .collect();

        Self {
            id: enemy.id().to_string(),
            name: enemy.name().to_string(),
            hp: enemy.current_hp(),
            max_hp: enemy.max_hp(),
            shield: enemy.current_shield(),
            armor: enemy.effective_armor(),
            dodge: enemy.effective_dodge(),
            accuracy: enemy.effective_accuracy(),
            regen_per_second: enemy.effective_regen_per_second(),
            poison_per_second: enemy.poison_per_second(),
            spells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::starting::{minor_heal, singe};

    #[test]
    fn test_player_snapshot_marks_equipped_spells() {
        let mut player = Player::new("Tester");
        player.add_spell(singe());
        player.add_spell(minor_heal());
        player.equip_spell(1, SlotKind::Passive, 3).unwrap();

        let snapshot = PlayerSnapshot::capture(&player);
        assert_eq!(snapshot.hp, 30);
        assert_eq!(snapshot.inventory.len(), 2);
        assert_eq!(snapshot.inventory[0].equipped, None);
        assert_eq!(snapshot.inventory[1].equipped, Some((SlotKind::Passive, 3)));
        assert_eq!(snapshot.passive_slots[3].as_deref(), Some("Minor Heal"));
        assert!(snapshot.active_slots.iter().all(Option::is_none));
        assert_eq!(snapshot.attributes.len(), 10);
        assert_eq!(snapshot.attributes[0].upgrade_cost, 10);
    }

    #[test]
    fn test_snapshot_serializes() {
        let player = Player::new("Tester");
        let json = serde_json::to_value(PlayerSnapshot::capture(&player)).unwrap();
        assert_eq!(json["max_hp"], 30);
        assert_eq!(json["attributes"][0]["attribute"], "AGILITY");
    }
}
