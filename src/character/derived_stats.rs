use super::attributes::{Attributes, PrimaryAttribute};
use crate::core::constants::*;
use crate::spells::types::{DamageType, HealingType, NUM_DAMAGE_TYPES, NUM_HEALING_TYPES};

/// Secondary stats derived from primary attribute scores.
///
/// A pure function of the attributes it was computed from; recompute after
/// any attribute changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub dodge_percent: f64,
    pub accuracy_percent: f64,
    pub casting_haste_percent: f64,
    pub max_health_bonus_percent: f64,
    pub debuff_effectiveness_percent: f64,
    pub shield_effectiveness_percent: f64,
    pub flat_hp_bonus: f64,
    damage_bonus_percent: [f64; NUM_DAMAGE_TYPES],
    healing_bonus_percent: [f64; NUM_HEALING_TYPES],
}

impl DerivedStats {
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let score = |attr: PrimaryAttribute| attrs.get(attr) as f64;

        let mut damage_bonus_percent = [0.0; NUM_DAMAGE_TYPES];
        for damage_type in DamageType::all() {
            damage_bonus_percent[damage_type.index()] =
                score(damage_type.bonus_attribute()) * TYPED_BONUS_PER_POINT;
        }

        let mut healing_bonus_percent = [0.0; NUM_HEALING_TYPES];
        for healing_type in HealingType::all() {
            healing_bonus_percent[healing_type.index()] =
                score(healing_type.bonus_attribute()) * TYPED_BONUS_PER_POINT;
        }

        Self {
            dodge_percent: score(PrimaryAttribute::Agility) * DODGE_PER_AGILITY,
            accuracy_percent: BASE_ACCURACY_PERCENT
                + score(PrimaryAttribute::Dexterity) * ACCURACY_PER_DEXTERITY,
            casting_haste_percent: score(PrimaryAttribute::Cunning) * HASTE_PER_CUNNING,
            max_health_bonus_percent: score(PrimaryAttribute::Fortitude)
                * MAX_HEALTH_PERCENT_PER_FORTITUDE,
            debuff_effectiveness_percent: score(PrimaryAttribute::Malice)
                * DEBUFF_EFFECTIVENESS_PER_MALICE,
            shield_effectiveness_percent: score(PrimaryAttribute::Mind)
                * SHIELD_EFFECTIVENESS_PER_MIND,
            flat_hp_bonus: attrs.total() as f64 * HP_PER_ATTRIBUTE_POINT,
            damage_bonus_percent,
            healing_bonus_percent,
        }
    }

    pub fn damage_bonus_percent(&self, damage_type: DamageType) -> f64 {
        self.damage_bonus_percent[damage_type.index()]
    }

    pub fn healing_bonus_percent(&self, healing_type: HealingType) -> f64 {
        self.healing_bonus_percent[healing_type.index()]
    }
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self::from_attributes(&Attributes::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_attributes_give_base_values() {
        let stats = DerivedStats::default();
        assert_eq!(stats.dodge_percent, 0.0);
        assert_eq!(stats.accuracy_percent, 100.0);
        assert_eq!(stats.max_health_bonus_percent, 0.0);
        assert_eq!(stats.flat_hp_bonus, 0.0);
        for dt in DamageType::all() {
            assert_eq!(stats.damage_bonus_percent(dt), 0.0);
        }
    }

    #[test]
    fn test_secondary_stat_coefficients() {
        let mut attrs = Attributes::new();
        attrs.set(PrimaryAttribute::Agility, 3);
        attrs.set(PrimaryAttribute::Dexterity, 4);
        attrs.set(PrimaryAttribute::Cunning, 2);
        attrs.set(PrimaryAttribute::Fortitude, 2);
        attrs.set(PrimaryAttribute::Malice, 1);
        attrs.set(PrimaryAttribute::Mind, 1);

        let stats = DerivedStats::from_attributes(&attrs);
        assert_eq!(stats.dodge_percent, 3.0);
        assert_eq!(stats.accuracy_percent, 104.0);
        assert_eq!(stats.casting_haste_percent, 2.0);
        assert_eq!(stats.max_health_bonus_percent, 10.0);
        assert_eq!(stats.debuff_effectiveness_percent, 1.0);
        assert_eq!(stats.shield_effectiveness_percent, 10.0);
        // 13 points * 2 HP
        assert_eq!(stats.flat_hp_bonus, 26.0);
    }

    #[test]
    fn test_typed_bonuses_follow_attribute_mapping() {
        let mut attrs = Attributes::new();
        attrs.set(PrimaryAttribute::Intellect, 2);
        attrs.set(PrimaryAttribute::Piety, 3);

        let stats = DerivedStats::from_attributes(&attrs);
        assert_eq!(stats.damage_bonus_percent(DamageType::Fire), 20.0);
        assert_eq!(stats.damage_bonus_percent(DamageType::Cold), 20.0);
        assert_eq!(stats.damage_bonus_percent(DamageType::Holy), 30.0);
        assert_eq!(stats.damage_bonus_percent(DamageType::Dark), 0.0);
        assert_eq!(stats.healing_bonus_percent(HealingType::PietyHealing), 30.0);
        assert_eq!(stats.healing_bonus_percent(HealingType::CharmHealing), 0.0);
    }
}
