use crate::character::attributes::PrimaryAttribute;
use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    Arcane,
    Sonic,
    Entropy,
    Astral,
    Acid,
    Fire,
    Cold,
    Dark,
    Psychic,
    Holy,
    Lightning,
}

pub const NUM_DAMAGE_TYPES: usize = 11;

impl DamageType {
    pub fn all() -> [DamageType; NUM_DAMAGE_TYPES] {
        [
            DamageType::Arcane,
            DamageType::Sonic,
            DamageType::Entropy,
            DamageType::Astral,
            DamageType::Acid,
            DamageType::Fire,
            DamageType::Cold,
            DamageType::Dark,
            DamageType::Psychic,
            DamageType::Holy,
            DamageType::Lightning,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Arcane => "Arcane",
            DamageType::Sonic => "Sonic",
            DamageType::Entropy => "Entropy",
            DamageType::Astral => "Astral",
            DamageType::Acid => "Acid",
            DamageType::Fire => "Fire",
            DamageType::Cold => "Cold",
            DamageType::Dark => "Dark",
            DamageType::Psychic => "Psychic",
            DamageType::Holy => "Holy",
            DamageType::Lightning => "Lightning",
        }
    }

    /// The attribute whose score grants +10% per point to this damage type.
    pub fn bonus_attribute(&self) -> PrimaryAttribute {
        match self {
            DamageType::Arcane => PrimaryAttribute::Agility,
            DamageType::Sonic => PrimaryAttribute::Charm,
            DamageType::Entropy => PrimaryAttribute::Cunning,
            DamageType::Astral => PrimaryAttribute::Dexterity,
            DamageType::Acid => PrimaryAttribute::Fortitude,
            DamageType::Fire | DamageType::Cold => PrimaryAttribute::Intellect,
            DamageType::Dark => PrimaryAttribute::Malice,
            DamageType::Psychic => PrimaryAttribute::Mind,
            DamageType::Holy => PrimaryAttribute::Piety,
            DamageType::Lightning => PrimaryAttribute::Wisdom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealingType {
    CharmHealing,
    PietyHealing,
    WisdomHealing,
}

pub const NUM_HEALING_TYPES: usize = 3;

impl HealingType {
    pub fn all() -> [HealingType; NUM_HEALING_TYPES] {
        [
            HealingType::CharmHealing,
            HealingType::PietyHealing,
            HealingType::WisdomHealing,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            HealingType::CharmHealing => "Charm",
            HealingType::PietyHealing => "Piety",
            HealingType::WisdomHealing => "Wisdom",
        }
    }

    pub fn bonus_attribute(&self) -> PrimaryAttribute {
        match self {
            HealingType::CharmHealing => PrimaryAttribute::Charm,
            HealingType::PietyHealing => PrimaryAttribute::Piety,
            HealingType::WisdomHealing => PrimaryAttribute::Wisdom,
        }
    }
}

/// Combat stats that accept temporary in-combat deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporaryStat {
    Armor,
    Dodge,
    Accuracy,
    RegenPerSecond,
}

impl TemporaryStat {
    pub fn name(&self) -> &'static str {
        match self {
            TemporaryStat::Armor => "Armor",
            TemporaryStat::Dodge => "Dodge",
            TemporaryStat::Accuracy => "Accuracy",
            TemporaryStat::RegenPerSecond => "Regen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoreEffectKind {
    Damage { damage_type: DamageType },
    Healing { healing_type: HealingType },
    ShieldApplication,
    ApplyDot {
        dot_type: String,
        #[serde(default)]
        stacking: bool,
    },
    BuffPlayer { stat: TemporaryStat },
    DebuffEnemy { stat: TemporaryStat },
}

impl CoreEffectKind {
    /// Whether the core value of this kind counts toward a spell's AP value.
    pub fn has_quantified_strength(&self) -> bool {
        match self {
            CoreEffectKind::Damage { .. }
            | CoreEffectKind::Healing { .. }
            | CoreEffectKind::ShieldApplication
            | CoreEffectKind::ApplyDot { .. }
            | CoreEffectKind::BuffPlayer { .. }
            | CoreEffectKind::DebuffEnemy { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreEffect {
    pub base_value: f64,
    pub effect: CoreEffectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownRange {
    pub min: f64,
    pub max: f64,
}

impl CooldownRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.min && seconds <= self.max
    }
}

/// Secondary effect applied to a damaged target that survives the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    try_from = "OnHitRepr"
)]
pub enum OnHitEffect {
    StatReduction { stat: TemporaryStat, magnitude: i32 },
}

/// Content files may spell an on-hit effect either structured or as a
/// legacy key string.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnHitRepr {
    Legacy(String),
    Structured(StructuredOnHit),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
enum StructuredOnHit {
    StatReduction { stat: TemporaryStat, magnitude: i32 },
}

impl TryFrom<OnHitRepr> for OnHitEffect {
    type Error = ContentError;

    fn try_from(repr: OnHitRepr) -> Result<Self, Self::Error> {
        match repr {
            OnHitRepr::Legacy(key) => OnHitEffect::from_legacy_key(&key),
            OnHitRepr::Structured(StructuredOnHit::StatReduction { stat, magnitude }) => {
                Ok(OnHitEffect::StatReduction { stat, magnitude })
            }
        }
    }
}

const LEGACY_ON_HIT_STATS: [(&str, TemporaryStat); 4] = [
    ("REDUCE_ENEMY_ARMOR", TemporaryStat::Armor),
    ("REDUCE_ENEMY_ACCURACY", TemporaryStat::Accuracy),
    ("REDUCE_ENEMY_DODGE", TemporaryStat::Dodge),
    ("REDUCE_ENEMY_REGEN", TemporaryStat::RegenPerSecond),
];

impl OnHitEffect {
    /// Converts a key like `REDUCE_ENEMY_ARMOR_1_FLAT_STACKING`.
    ///
    /// The magnitude is the first `_`-separated integer token (1 if none).
    /// The key must name exactly one reducible stat.
    pub fn from_legacy_key(key: &str) -> Result<Self, ContentError> {
        let upper = key.trim().to_ascii_uppercase();
        let magnitude = upper
            .split('_')
            .find_map(|token| token.parse::<i32>().ok())
            .unwrap_or(1);

        let mut matched = LEGACY_ON_HIT_STATS
            .iter()
            .filter(|(marker, _)| upper.contains(marker))
            .map(|(_, stat)| *stat);

        match (matched.next(), matched.next()) {
            (Some(stat), None) => Ok(OnHitEffect::StatReduction { stat, magnitude }),
            (Some(_), Some(_)) => Err(ContentError::AmbiguousOnHit(key.to_string())),
            (None, _) => Err(ContentError::UnknownOnHit(key.to_string())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OnHitEffect::StatReduction { stat, magnitude } => {
                format!("reduce enemy {} by {}", stat.name().to_lowercase(), magnitude)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InherentProperties {
    pub double_damage_to_shields: bool,
    pub armor_piercing: bool,
    pub shield_piercing: bool,
    pub always_hits: bool,
    pub accuracy_bonus: i32,
    pub on_hit: Option<OnHitEffect>,
}

/// Immutable definition a spell instance is rolled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellTemplate {
    pub id: String,
    pub name: String,
    /// `None` means potency ignores the attribute damage/healing bonus.
    #[serde(default)]
    pub scaling_attribute: Option<PrimaryAttribute>,
    pub core_effect: CoreEffect,
    pub cooldown: CooldownRange,
    #[serde(default)]
    pub inherent: InherentProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlatPlayerStat {
    MaxHp,
    Armor,
    RegenPerSecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PercentPlayerStat {
    DodgeChance,
    GlobalAccuracy,
}

/// What an enchantment modifies, resolved when content is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnchantEffect {
    PlayerStatFlat { stat: FlatPlayerStat },
    PlayerStatPercent { stat: PercentPlayerStat },
    PrimaryAttributeFlat { attribute: PrimaryAttribute },
    DamageTypePercent { damage_type: DamageType },
    HealingTypePercent { healing_type: HealingType },
    SpellAccuracyFlat,
    SpellPotencyFlat,
    SpellPotencyPercent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantmentDefinition {
    pub id: String,
    /// Contains a `{value}` placeholder.
    pub description_template: String,
    pub effect: EnchantEffect,
    pub base_value: f64,
    pub max_value_at_reference_floor: f64,
}

impl EnchantmentDefinition {
    pub fn describe(&self, value: f64) -> String {
        self.description_template
            .replace("{value}", &format_value(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantmentInstance {
    pub definition: Arc<EnchantmentDefinition>,
    pub value: f64,
}

impl EnchantmentInstance {
    pub fn effect(&self) -> EnchantEffect {
        self.definition.effect
    }

    pub fn description(&self) -> String {
        self.definition.describe(self.value)
    }
}

/// A concrete spell rolled from a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellInstance {
    pub template: Arc<SpellTemplate>,
    pub cooldown_seconds: f64,
    pub core_value: f64,
    pub enchantments: Vec<EnchantmentInstance>,
    pub ap_value: u32,
}

impl SpellInstance {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn effect(&self) -> &CoreEffectKind {
        &self.template.core_effect.effect
    }

    pub fn scaling_attribute(&self) -> Option<PrimaryAttribute> {
        self.template.scaling_attribute
    }

    /// Enchantments of this spell with the given effect.
    pub fn enchantments_with(
        &self,
        effect: EnchantEffect,
    ) -> impl Iterator<Item = &EnchantmentInstance> + '_ {
        self.enchantments
            .iter()
            .filter(move |e| e.effect() == effect)
    }

    /// Multi-line summary for inventory listings.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        match self.template.scaling_attribute {
            Some(attr) => out.push_str(&format!("{} (Scales: {})\n", self.name(), attr.name())),
            None => out.push_str(&format!("{}\n", self.name())),
        }
        out.push_str(&format!("  Cooldown: {:.1}s\n", self.cooldown_seconds));

        let value = format_value(self.core_value);
        let effect = match self.effect() {
            CoreEffectKind::Damage { damage_type } => {
                format!("{} {} Damage", value, damage_type.name())
            }
            CoreEffectKind::Healing { healing_type } => {
                format!("{} {} Healing", value, healing_type.name())
            }
            CoreEffectKind::ShieldApplication => format!("{} Shield", value),
            CoreEffectKind::ApplyDot { dot_type, stacking } => {
                let mut s = format!("Applies {} {}/sec", value, dot_type);
                if *stacking {
                    s.push_str(" (Stacking)");
                }
                s
            }
            CoreEffectKind::BuffPlayer { stat } => format!("+{} {} (self)", value, stat.name()),
            CoreEffectKind::DebuffEnemy { stat } => format!("-{} enemy {}", value, stat.name()),
        };
        out.push_str(&format!("  Effect: {}\n", effect));

        let inherent = &self.template.inherent;
        let mut traits = Vec::new();
        if inherent.accuracy_bonus > 0 {
            traits.push(format!("+{} Accuracy", inherent.accuracy_bonus));
        }
        if inherent.always_hits {
            traits.push("Always Hits".to_string());
        }
        if inherent.armor_piercing {
            traits.push("Ignores Armor".to_string());
        }
        if inherent.shield_piercing {
            traits.push("Ignores Shield".to_string());
        }
        if inherent.double_damage_to_shields {
            traits.push("Double Damage to Shields".to_string());
        }
        if let Some(on_hit) = &inherent.on_hit {
            traits.push(format!("On-Hit: {}", on_hit.describe()));
        }
        if !traits.is_empty() {
            out.push_str(&format!("  Inherent: {}\n", traits.join(", ")));
        }

        if !self.enchantments.is_empty() {
            out.push_str(&format!("  Enchantments ({}):\n", self.enchantments.len()));
            for enchant in &self.enchantments {
                out.push_str(&format!("    - {}\n", enchant.description()));
            }
        }
        out.push_str(&format!("  AP Value: {}", self.ap_value));
        out
    }
}

impl fmt::Display for SpellInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} AP)", self.name(), self.ap_value)
    }
}

/// Whole numbers print without a fractional part, others with one decimal.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
