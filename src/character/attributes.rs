use crate::core::constants::NUM_PRIMARY_ATTRIBUTES;
use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAttribute {
    Agility,
    Charm,
    Cunning,
    Dexterity,
    Fortitude,
    Intellect,
    Malice,
    Mind,
    Piety,
    Wisdom,
}

impl PrimaryAttribute {
    pub fn all() -> [PrimaryAttribute; NUM_PRIMARY_ATTRIBUTES] {
        [
            PrimaryAttribute::Agility,
            PrimaryAttribute::Charm,
            PrimaryAttribute::Cunning,
            PrimaryAttribute::Dexterity,
            PrimaryAttribute::Fortitude,
            PrimaryAttribute::Intellect,
            PrimaryAttribute::Malice,
            PrimaryAttribute::Mind,
            PrimaryAttribute::Piety,
            PrimaryAttribute::Wisdom,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimaryAttribute::Agility => "Agility",
            PrimaryAttribute::Charm => "Charm",
            PrimaryAttribute::Cunning => "Cunning",
            PrimaryAttribute::Dexterity => "Dexterity",
            PrimaryAttribute::Fortitude => "Fortitude",
            PrimaryAttribute::Intellect => "Intellect",
            PrimaryAttribute::Malice => "Malice",
            PrimaryAttribute::Mind => "Mind",
            PrimaryAttribute::Piety => "Piety",
            PrimaryAttribute::Wisdom => "Wisdom",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PrimaryAttribute::Agility => 0,
            PrimaryAttribute::Charm => 1,
            PrimaryAttribute::Cunning => 2,
            PrimaryAttribute::Dexterity => 3,
            PrimaryAttribute::Fortitude => 4,
            PrimaryAttribute::Intellect => 5,
            PrimaryAttribute::Malice => 6,
            PrimaryAttribute::Mind => 7,
            PrimaryAttribute::Piety => 8,
            PrimaryAttribute::Wisdom => 9,
        }
    }
}

impl FromStr for PrimaryAttribute {
    type Err = CommandError;

    /// Case-insensitive; accepts the full name only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PrimaryAttribute::all()
            .into_iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CommandError::UnknownAttribute(wanted.to_string()))
    }
}

/// Primary attribute scores. Scores are unsigned, so the "never negative"
/// rule holds by construction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    values: [u32; NUM_PRIMARY_ATTRIBUTES],
}

impl Attributes {
    /// Every attribute starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: PrimaryAttribute) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: PrimaryAttribute, value: u32) {
        self.values[attr.index()] = value;
    }

    pub fn increment(&mut self, attr: PrimaryAttribute) {
        self.values[attr.index()] = self.values[attr.index()].saturating_add(1);
    }

    /// Adds another set of scores on top of this one (for enchantment bonuses).
    pub fn add(&mut self, other: &Attributes) {
        for attr in PrimaryAttribute::all() {
            self.values[attr.index()] = self.values[attr.index()].saturating_add(other.get(attr));
        }
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attributes_start_at_zero() {
        let attrs = Attributes::new();
        for attr in PrimaryAttribute::all() {
            assert_eq!(attrs.get(attr), 0);
        }
        assert_eq!(attrs.total(), 0);
    }

    #[test]
    fn test_get_set_increment() {
        let mut attrs = Attributes::new();
        attrs.set(PrimaryAttribute::Intellect, 4);
        attrs.increment(PrimaryAttribute::Intellect);
        attrs.increment(PrimaryAttribute::Piety);
        assert_eq!(attrs.get(PrimaryAttribute::Intellect), 5);
        assert_eq!(attrs.get(PrimaryAttribute::Piety), 1);
        assert_eq!(attrs.total(), 6);
    }

    #[test]
    fn test_add_merges_scores() {
        let mut base = Attributes::new();
        base.set(PrimaryAttribute::Mind, 2);
        let mut bonus = Attributes::new();
        bonus.set(PrimaryAttribute::Mind, 3);
        bonus.set(PrimaryAttribute::Malice, 1);
        base.add(&bonus);
        assert_eq!(base.get(PrimaryAttribute::Mind), 5);
        assert_eq!(base.get(PrimaryAttribute::Malice), 1);
    }

    #[test]
    fn test_index_returns_unique_values() {
        for (i, attr) in PrimaryAttribute::all().iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "intellect".parse::<PrimaryAttribute>(),
            Ok(PrimaryAttribute::Intellect)
        );
        assert_eq!(" PIETY ".parse::<PrimaryAttribute>(), Ok(PrimaryAttribute::Piety));
        assert_eq!(
            "luck".parse::<PrimaryAttribute>(),
            Err(CommandError::UnknownAttribute("luck".to_string()))
        );
    }
}
