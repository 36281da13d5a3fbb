use super::inventory::SpellId;
use crate::combat::combatant::tick_cooldown;
use crate::core::constants::{NUM_ACTIVE_SPELL_SLOTS, NUM_PASSIVE_SPELL_SLOTS};
use crate::error::CommandError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Cast in combat on cooldown.
    Active,
    /// Contributes enchantments only.
    Passive,
}

impl SlotKind {
    pub fn name(&self) -> &'static str {
        match self {
            SlotKind::Active => "active",
            SlotKind::Passive => "passive",
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            SlotKind::Active => NUM_ACTIVE_SPELL_SLOTS,
            SlotKind::Passive => NUM_PASSIVE_SPELL_SLOTS,
        }
    }
}

/// An equipped active spell and its cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveSlot {
    pub spell: SpellId,
    pub full_cooldown: f64,
    pub remaining: f64,
}

/// Fixed-size slot arrays. Cooldowns live with the slot, so unequipping and
/// re-equipping the same spell starts it fresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    active: [Option<ActiveSlot>; NUM_ACTIVE_SPELL_SLOTS],
    passive: [Option<SpellId>; NUM_PASSIVE_SPELL_SLOTS],
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_slot(kind: SlotKind, index: usize) -> Result<(), CommandError> {
        if index >= kind.capacity() {
            return Err(CommandError::InvalidSlot {
                kind: kind.name(),
                index,
            });
        }
        Ok(())
    }

    pub fn active(&self, index: usize) -> Option<&ActiveSlot> {
        self.active.get(index).and_then(|s| s.as_ref())
    }

    pub fn passive(&self, index: usize) -> Option<SpellId> {
        self.passive.get(index).copied().flatten()
    }

    pub fn slot(&self, kind: SlotKind, index: usize) -> Option<SpellId> {
        match kind {
            SlotKind::Active => self.active(index).map(|s| s.spell),
            SlotKind::Passive => self.passive(index),
        }
    }

    /// All equipped spells, active slots first.
    pub fn equipped(&self) -> impl Iterator<Item = SpellId> + '_ {
        self.active
            .iter()
            .flatten()
            .map(|s| s.spell)
            .chain(self.passive.iter().flatten().copied())
    }

    pub fn contains(&self, id: SpellId) -> bool {
        self.equipped().any(|equipped| equipped == id)
    }

    pub fn slot_of(&self, id: SpellId) -> Option<(SlotKind, usize)> {
        if let Some(index) = self.active.iter().position(|s| s.map(|s| s.spell) == Some(id)) {
            return Some((SlotKind::Active, index));
        }
        self.passive
            .iter()
            .position(|s| *s == Some(id))
            .map(|index| (SlotKind::Passive, index))
    }

    /// Puts a spell into a slot, returning whatever was displaced.
    /// Active spells start on their full cooldown.
    pub fn equip(
        &mut self,
        kind: SlotKind,
        index: usize,
        id: SpellId,
        cooldown_seconds: f64,
    ) -> Result<Option<SpellId>, CommandError> {
        Self::check_slot(kind, index)?;
        let displaced = match kind {
            SlotKind::Active => self.active[index]
                .replace(ActiveSlot {
                    spell: id,
                    full_cooldown: cooldown_seconds,
                    remaining: cooldown_seconds,
                })
                .map(|s| s.spell),
            SlotKind::Passive => self.passive[index].replace(id),
        };
        Ok(displaced)
    }

    pub fn unequip(&mut self, kind: SlotKind, index: usize) -> Result<SpellId, CommandError> {
        Self::check_slot(kind, index)?;
        let removed = match kind {
            SlotKind::Active => self.active[index].take().map(|s| s.spell),
            SlotKind::Passive => self.passive[index].take(),
        };
        removed.ok_or(CommandError::EmptySlot {
            kind: kind.name(),
            index,
        })
    }

    pub fn reset_cooldowns(&mut self) {
        for slot in self.active.iter_mut().flatten() {
            slot.remaining = slot.full_cooldown;
        }
    }

    pub fn update_cooldowns(&mut self, delta_seconds: f64) {
        for slot in self.active.iter_mut().flatten() {
            tick_cooldown(&mut slot.remaining, delta_seconds);
        }
    }

    pub fn ready_slots(&self) -> Vec<usize> {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Some(s) if s.remaining <= 0.0 => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn trigger_cooldown(&mut self, index: usize) {
        if let Some(Some(slot)) = self.active.get_mut(index) {
            slot.remaining = slot.full_cooldown;
        }
    }
}
