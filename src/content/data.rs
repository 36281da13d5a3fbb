//! Compiled-in content: the loot pool and one enemy per floor.

use super::ContentCatalog;
use crate::character::attributes::PrimaryAttribute;
use crate::combat::enemy::{EnemySpell, EnemyTemplate};
use crate::spells::types::{
    CooldownRange, CoreEffect, CoreEffectKind, DamageType, EnchantEffect, EnchantmentDefinition,
    FlatPlayerStat, HealingType, InherentProperties, OnHitEffect, PercentPlayerStat,
    SpellTemplate, TemporaryStat,
};
use std::sync::Arc;

/// The full built-in catalogue (10 floors).
pub fn builtin_content() -> ContentCatalog {
    ContentCatalog {
        spell_templates: builtin_spell_templates().into_iter().map(Arc::new).collect(),
        enchantments: builtin_enchantments().into_iter().map(Arc::new).collect(),
        enemies: builtin_enemies(),
    }
}

fn template(
    id: &str,
    name: &str,
    scaling_attribute: Option<PrimaryAttribute>,
    base_value: f64,
    effect: CoreEffectKind,
    cooldown: (f64, f64),
    inherent: InherentProperties,
) -> SpellTemplate {
    SpellTemplate {
        id: id.to_string(),
        name: name.to_string(),
        scaling_attribute,
        core_effect: CoreEffect { base_value, effect },
        cooldown: CooldownRange::new(cooldown.0, cooldown.1),
        inherent,
    }
}

fn damage(damage_type: DamageType) -> CoreEffectKind {
    CoreEffectKind::Damage { damage_type }
}

pub fn builtin_spell_templates() -> Vec<SpellTemplate> {
    use PrimaryAttribute::*;

    vec![
        // Damage
        template(
            "FIRE_BOLT",
            "Fire Bolt",
            Some(Intellect),
            5.0,
            damage(DamageType::Fire),
            (3.0, 4.5),
            InherentProperties::default(),
        ),
        template(
            "FROST_SHARD",
            "Frost Shard",
            Some(Intellect),
            4.0,
            damage(DamageType::Cold),
            (2.5, 3.5),
            InherentProperties {
                on_hit: Some(OnHitEffect::StatReduction {
                    stat: TemporaryStat::Dodge,
                    magnitude: 1,
                }),
                ..Default::default()
            },
        ),
        template(
            "ARCANE_MISSILE",
            "Arcane Missile",
            Some(Agility),
            3.0,
            damage(DamageType::Arcane),
            (1.5, 2.5),
            InherentProperties {
                always_hits: true,
                ..Default::default()
            },
        ),
        template(
            "ACID_SPLASH",
            "Acid Splash",
            Some(Fortitude),
            4.0,
            damage(DamageType::Acid),
            (3.0, 4.0),
            InherentProperties {
                on_hit: Some(OnHitEffect::StatReduction {
                    stat: TemporaryStat::Armor,
                    magnitude: 1,
                }),
                ..Default::default()
            },
        ),
        template(
            "THUNDERCLAP",
            "Thunderclap",
            Some(Wisdom),
            7.0,
            damage(DamageType::Lightning),
            (5.0, 6.5),
            InherentProperties {
                double_damage_to_shields: true,
                ..Default::default()
            },
        ),
        template(
            "SHADOW_LANCE",
            "Shadow Lance",
            Some(Malice),
            6.0,
            damage(DamageType::Dark),
            (4.0, 5.0),
            InherentProperties {
                armor_piercing: true,
                ..Default::default()
            },
        ),
        template(
            "MIND_SPIKE",
            "Mind Spike",
            Some(Mind),
            5.0,
            damage(DamageType::Psychic),
            (3.5, 4.5),
            InherentProperties {
                shield_piercing: true,
                on_hit: Some(OnHitEffect::StatReduction {
                    stat: TemporaryStat::Accuracy,
                    magnitude: 2,
                }),
                ..Default::default()
            },
        ),
        template(
            "SMITE",
            "Smite",
            Some(Piety),
            6.0,
            damage(DamageType::Holy),
            (4.0, 5.5),
            InherentProperties {
                accuracy_bonus: 15,
                ..Default::default()
            },
        ),
        template(
            "STARFALL",
            "Starfall",
            Some(Dexterity),
            9.0,
            damage(DamageType::Astral),
            (6.0, 8.0),
            InherentProperties::default(),
        ),
        template(
            "DISCORD",
            "Discord",
            Some(Charm),
            4.0,
            damage(DamageType::Sonic),
            (2.5, 3.5),
            InherentProperties {
                on_hit: Some(OnHitEffect::StatReduction {
                    stat: TemporaryStat::RegenPerSecond,
                    magnitude: 1,
                }),
                ..Default::default()
            },
        ),
        // Healing
        template(
            "MEND",
            "Mend",
            Some(Piety),
            3.0,
            CoreEffectKind::Healing {
                healing_type: HealingType::PietyHealing,
            },
            (4.0, 5.0),
            InherentProperties::default(),
        ),
        template(
            "SOOTHING_WORDS",
            "Soothing Words",
            Some(Charm),
            2.0,
            CoreEffectKind::Healing {
                healing_type: HealingType::CharmHealing,
            },
            (2.5, 3.5),
            InherentProperties::default(),
        ),
        template(
            "SAGES_RESTORATION",
            "Sage's Restoration",
            Some(Wisdom),
            5.0,
            CoreEffectKind::Healing {
                healing_type: HealingType::WisdomHealing,
            },
            (6.0, 7.5),
            InherentProperties::default(),
        ),
        // Utility
        template(
            "ARCANE_WARD",
            "Arcane Ward",
            None,
            4.0,
            CoreEffectKind::ShieldApplication,
            (5.0, 6.0),
            InherentProperties::default(),
        ),
        template(
            "VENOM_CURSE",
            "Venom Curse",
            None,
            1.0,
            CoreEffectKind::ApplyDot {
                dot_type: "Venom".to_string(),
                stacking: true,
            },
            (4.0, 5.0),
            InherentProperties::default(),
        ),
        template(
            "STONESKIN",
            "Stoneskin",
            None,
            1.0,
            CoreEffectKind::BuffPlayer {
                stat: TemporaryStat::Armor,
            },
            (6.0, 8.0),
            InherentProperties::default(),
        ),
        template(
            "BLINDING_FLASH",
            "Blinding Flash",
            None,
            3.0,
            CoreEffectKind::DebuffEnemy {
                stat: TemporaryStat::Accuracy,
            },
            (5.0, 6.0),
            InherentProperties::default(),
        ),
    ]
}

fn enchant(
    id: &str,
    description_template: &str,
    effect: EnchantEffect,
    base_value: f64,
    max_value_at_reference_floor: f64,
) -> EnchantmentDefinition {
    EnchantmentDefinition {
        id: id.to_string(),
        description_template: description_template.to_string(),
        effect,
        base_value,
        max_value_at_reference_floor,
    }
}

pub fn builtin_enchantments() -> Vec<EnchantmentDefinition> {
    vec![
        enchant(
            "ENCH_MAX_HP",
            "+{value} Max HP",
            EnchantEffect::PlayerStatFlat {
                stat: FlatPlayerStat::MaxHp,
            },
            3.0,
            80.0,
        ),
        enchant(
            "ENCH_ARMOR",
            "+{value} Armor",
            EnchantEffect::PlayerStatFlat {
                stat: FlatPlayerStat::Armor,
            },
            1.0,
            20.0,
        ),
        enchant(
            "ENCH_REGEN",
            "+{value} HP regeneration per second",
            EnchantEffect::PlayerStatFlat {
                stat: FlatPlayerStat::RegenPerSecond,
            },
            1.0,
            10.0,
        ),
        enchant(
            "ENCH_DODGE",
            "+{value}% Dodge",
            EnchantEffect::PlayerStatPercent {
                stat: PercentPlayerStat::DodgeChance,
            },
            1.0,
            25.0,
        ),
        enchant(
            "ENCH_ACCURACY",
            "+{value}% Accuracy",
            EnchantEffect::PlayerStatPercent {
                stat: PercentPlayerStat::GlobalAccuracy,
            },
            2.0,
            30.0,
        ),
        enchant(
            "ENCH_ADD_INTELLECT",
            "+{value} Intellect",
            EnchantEffect::PrimaryAttributeFlat {
                attribute: PrimaryAttribute::Intellect,
            },
            1.0,
            15.0,
        ),
        enchant(
            "ENCH_ADD_FORTITUDE",
            "+{value} Fortitude",
            EnchantEffect::PrimaryAttributeFlat {
                attribute: PrimaryAttribute::Fortitude,
            },
            1.0,
            15.0,
        ),
        enchant(
            "ENCH_ADD_AGILITY",
            "+{value} Agility",
            EnchantEffect::PrimaryAttributeFlat {
                attribute: PrimaryAttribute::Agility,
            },
            1.0,
            15.0,
        ),
        enchant(
            "ENCH_FIRE_DAMAGE",
            "+{value}% Fire damage",
            EnchantEffect::DamageTypePercent {
                damage_type: DamageType::Fire,
            },
            5.0,
            55.0,
        ),
        enchant(
            "ENCH_HOLY_DAMAGE",
            "+{value}% Holy damage",
            EnchantEffect::DamageTypePercent {
                damage_type: DamageType::Holy,
            },
            5.0,
            55.0,
        ),
        enchant(
            "ENCH_PIETY_HEALING",
            "+{value}% Piety healing",
            EnchantEffect::HealingTypePercent {
                healing_type: HealingType::PietyHealing,
            },
            5.0,
            55.0,
        ),
        enchant(
            "ENCH_SPELL_ACCURACY",
            "+{value} accuracy for this spell",
            EnchantEffect::SpellAccuracyFlat,
            2.0,
            40.0,
        ),
        enchant(
            "ENCH_SPELL_POTENCY",
            "+{value} potency for this spell",
            EnchantEffect::SpellPotencyFlat,
            1.0,
            30.0,
        ),
        enchant(
            "ENCH_SPELL_POTENCY_PCT",
            "+{value}% potency for this spell",
            EnchantEffect::SpellPotencyPercent,
            5.0,
            100.0,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn enemy(
    id: &str,
    name: &str,
    max_hp: u32,
    accuracy: i32,
    dodge: i32,
    armor: i32,
    initial_shield: u32,
    regen_per_second: i32,
    spells: Vec<EnemySpell>,
) -> EnemyTemplate {
    EnemyTemplate {
        id: id.to_string(),
        name: name.to_string(),
        max_hp,
        accuracy,
        dodge,
        armor,
        initial_shield,
        regen_per_second,
        spells,
    }
}

/// One enemy per floor, floor 1 first.
pub fn builtin_enemies() -> Vec<EnemyTemplate> {
    vec![
        enemy(
            "CELLAR_RAT",
            "Cellar Rat",
            12,
            80,
            0,
            0,
            0,
            0,
            vec![EnemySpell::new("Gnaw", 2, 3.0)],
        ),
        enemy(
            "CANDLE_IMP",
            "Candle Imp",
            18,
            85,
            5,
            0,
            0,
            0,
            vec![EnemySpell::new("Spark", 3, 3.5)],
        ),
        enemy(
            "MOSS_GOLEM",
            "Moss Golem",
            30,
            75,
            0,
            1,
            0,
            1,
            vec![EnemySpell::new("Slam", 5, 5.0)],
        ),
        enemy(
            "WARDED_ACOLYTE",
            "Warded Acolyte",
            26,
            90,
            5,
            0,
            8,
            0,
            vec![
                EnemySpell::new("Hex Bolt", 3, 3.0),
                EnemySpell::new("Mind Lash", 2, 4.0).shield_piercing(),
            ],
        ),
        enemy(
            "GRAVE_HOUND",
            "Grave Hound",
            34,
            95,
            10,
            1,
            0,
            0,
            vec![
                EnemySpell::new("Bite", 4, 2.5),
                EnemySpell::new("Rend", 6, 6.0).armor_piercing(),
            ],
        ),
        enemy(
            "IRONBARK_SENTINEL",
            "Ironbark Sentinel",
            48,
            85,
            0,
            3,
            0,
            2,
            vec![EnemySpell::new("Branch Sweep", 7, 5.0)],
        ),
        enemy(
            "STORM_WISP",
            "Storm Wisp",
            32,
            100,
            20,
            0,
            10,
            0,
            vec![
                EnemySpell::new("Static Arc", 4, 2.0),
                EnemySpell::new("Chain Lightning", 8, 7.0).shield_piercing(),
            ],
        ),
        enemy(
            "BONE_COLOSSUS",
            "Bone Colossus",
            70,
            90,
            0,
            4,
            0,
            0,
            vec![
                EnemySpell::new("Crush", 9, 5.5),
                EnemySpell::new("Marrow Spike", 5, 4.0).armor_piercing(),
            ],
        ),
        enemy(
            "VOID_ORACLE",
            "Void Oracle",
            60,
            110,
            15,
            2,
            15,
            2,
            vec![
                EnemySpell::new("Null Ray", 7, 3.5),
                EnemySpell {
                    always_hits: true,
                    ..EnemySpell::new("Inevitable Gaze", 10, 8.0)
                },
            ],
        ),
        enemy(
            "ARCHMAGE_VESPERINE",
            "Archmage Vesperine",
            100,
            115,
            15,
            4,
            20,
            3,
            vec![
                EnemySpell::new("Sunder", 10, 4.0).armor_piercing(),
                EnemySpell::new("Unmaking", 14, 7.5).shield_piercing(),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_MAX_FLOOR;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_content_is_valid() {
        let content = builtin_content();
        assert!(content.validate().is_ok());
        assert_eq!(content.enemies.len() as u32, DEFAULT_MAX_FLOOR);
    }

    #[test]
    fn test_ids_are_unique() {
        let templates = builtin_spell_templates();
        let ids: HashSet<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), templates.len());

        let enchants = builtin_enchantments();
        let ids: HashSet<_> = enchants.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), enchants.len());

        let enemies = builtin_enemies();
        let ids: HashSet<_> = enemies.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), enemies.len());
    }

    #[test]
    fn test_every_core_effect_kind_is_in_the_pool() {
        let templates = builtin_spell_templates();
        let has = |pred: fn(&CoreEffectKind) -> bool| {
            templates.iter().any(|t| pred(&t.core_effect.effect))
        };
        assert!(has(|e| matches!(e, CoreEffectKind::Damage { .. })));
        assert!(has(|e| matches!(e, CoreEffectKind::Healing { .. })));
        assert!(has(|e| matches!(e, CoreEffectKind::ShieldApplication)));
        assert!(has(|e| matches!(e, CoreEffectKind::ApplyDot { .. })));
        assert!(has(|e| matches!(e, CoreEffectKind::BuffPlayer { .. })));
        assert!(has(|e| matches!(e, CoreEffectKind::DebuffEnemy { .. })));
    }

    #[test]
    fn test_enemies_get_tougher() {
        let enemies = builtin_enemies();
        assert!(enemies.first().unwrap().max_hp < enemies.last().unwrap().max_hp);
    }
}
