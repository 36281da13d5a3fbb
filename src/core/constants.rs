// Tick and timing
pub const DEFAULT_MAX_TICK_SECONDS: f64 = 0.1;
pub const PERIODIC_EFFECT_INTERVAL_SECONDS: f64 = 1.0;

// Floors
pub const DEFAULT_MAX_FLOOR: u32 = 10;
pub const FIRST_FLOOR: u32 = 1;
/// Floor depth the enchantment magnitude curve is normalised against.
/// Independent of how many floors are actually playable.
pub const ENCHANT_REFERENCE_FLOOR: f64 = 50.0;

// Player
pub const BASE_PLAYER_HP: f64 = 30.0;
pub const NUM_ACTIVE_SPELL_SLOTS: usize = 2;
pub const NUM_PASSIVE_SPELL_SLOTS: usize = 4;
pub const NUM_PRIMARY_ATTRIBUTES: usize = 10;
pub const HP_PER_ATTRIBUTE_POINT: f64 = 2.0;

// Stat model coefficients (percentage points per attribute point)
pub const BASE_ACCURACY_PERCENT: f64 = 100.0;
pub const DODGE_PER_AGILITY: f64 = 1.0;
pub const ACCURACY_PER_DEXTERITY: f64 = 1.0;
pub const HASTE_PER_CUNNING: f64 = 1.0;
pub const MAX_HEALTH_PERCENT_PER_FORTITUDE: f64 = 5.0;
pub const DEBUFF_EFFECTIVENESS_PER_MALICE: f64 = 1.0;
pub const SHIELD_EFFECTIVENESS_PER_MIND: f64 = 10.0;
pub const TYPED_BONUS_PER_POINT: f64 = 10.0;

// Hit resolution
pub const MIN_HIT_CHANCE: i32 = 5;
pub const MAX_HIT_CHANCE_VS_ENEMY: i32 = 99;
pub const MAX_HIT_CHANCE_VS_PLAYER: i32 = 100;
/// Accuracy assigned to always-hit attacks; far above any dodge value.
pub const ALWAYS_HIT_ACCURACY: i32 = 99_999;

// Spell valuation (AP)
pub const GLOBAL_BASE_AP_COST: f64 = 5.0;
pub const ENCHANT_COUNT_AP_MULTIPLIERS: [f64; 5] = [1.0, 1.25, 1.50, 1.75, 2.0];
pub const GENERATED_SPELL_MIN_AP: u32 = 5;
pub const FIXED_SPELL_MIN_AP: u32 = 1;
pub const MAX_ENCHANTS_PER_SPELL: usize = 4;

// Attribute upgrade cost: 10 + 0.5 * P^2 + 7 * P
pub const UPGRADE_COST_BASE: f64 = 10.0;
pub const UPGRADE_COST_QUADRATIC: f64 = 0.5;
pub const UPGRADE_COST_LINEAR: f64 = 7.0;
pub const MIN_UPGRADE_COST: u32 = 1;

/// Nearest integer, halves toward positive infinity (`floor(x + 0.5)`).
/// Every float-to-integer conversion in the engine goes through this.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
