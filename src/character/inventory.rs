use crate::spells::types::SpellInstance;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for a spell owned by the player. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub u64);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: SpellId,
    pub spell: SpellInstance,
}

/// Every spell the player owns, equipped or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    next_id: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spell: SpellInstance) -> SpellId {
        self.next_id += 1;
        let id = SpellId(self.next_id);
        self.entries.push(InventoryEntry { id, spell });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InventoryEntry> {
        self.entries.get(index)
    }

    pub fn get_by_id(&self, id: SpellId) -> Option<&SpellInstance> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.spell)
    }

    pub fn index_of(&self, id: SpellId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn remove(&mut self, index: usize) -> Option<InventoryEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter()
    }

    /// Ascending AP value; ties keep their current order.
    pub fn sort_by_ap_value(&mut self) {
        self.entries.sort_by_key(|e| e.spell.ap_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::starting::{minor_heal, singe};

    fn with_value(mut spell: SpellInstance, ap: u32) -> SpellInstance {
        spell.ap_value = ap;
        spell
    }

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let mut inv = Inventory::new();
        let a = inv.add(singe());
        let b = inv.add(minor_heal());
        assert_ne!(a, b);
        inv.remove(0);
        let c = inv.add(singe());
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn test_lookup_by_id_and_index() {
        let mut inv = Inventory::new();
        inv.add(singe());
        let heal = inv.add(minor_heal());
        assert_eq!(inv.index_of(heal), Some(1));
        assert_eq!(inv.get_by_id(heal).map(|s| s.name()), Some("Minor Heal"));
        assert!(inv.get(2).is_none());
        assert!(inv.remove(5).is_none());
    }

    #[test]
    fn test_sort_is_ascending_and_stable() {
        let mut inv = Inventory::new();
        let first_ten = inv.add(with_value(singe(), 10));
        let five = inv.add(with_value(singe(), 5));
        let second_ten = inv.add(with_value(minor_heal(), 10));
        let seven = inv.add(with_value(minor_heal(), 7));

        inv.sort_by_ap_value();
        let order: Vec<_> = inv.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![five, seven, first_ten, second_ten]);
    }

    #[test]
    fn test_sort_empty_inventory() {
        let mut inv = Inventory::new();
        inv.sort_by_ap_value();
        assert!(inv.is_empty());
    }
}
