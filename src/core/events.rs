//! Structured notifications from the engine to the presentation layer.
//!
//! The engine never formats output itself. Every observable step produces a
//! [`GameEvent`] that a [`PresentationSink`] receives; the sink never answers
//! back.

use crate::character::attributes::PrimaryAttribute;
use crate::character::loadout::SlotKind;
use crate::combat::combatant::PeriodicOutcome;
use crate::core::game_state::{CombatMode, GameState};
use crate::spells::types::TemporaryStat;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Which combatant an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Enemy => f.write_str("enemy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Combat ──────────────────────────────────────────────────
    /// A ready spell fired.
    SpellCast { caster: Side, spell: String },

    /// An attack landed and went through armor and shield.
    Hit {
        target: Side,
        spell: String,
        raw_damage: u32,
        mitigated: u32,
        absorbed_by_shield: u32,
        to_hp: u32,
        hp_after: u32,
        shield_after: u32,
    },

    /// An attack lost the dodge roll.
    Dodged {
        target: Side,
        spell: String,
        hit_chance: i32,
    },

    /// Damage was doubled because the target had shield up.
    DoubledAgainstShield { spell: String, damage: u32 },

    Healed {
        target: Side,
        amount: u32,
        hp_after: u32,
    },

    ShieldGained {
        target: Side,
        amount: u32,
        shield_after: u32,
    },

    PoisonApplied {
        target: Side,
        label: String,
        amount: u32,
        poison_per_second: u32,
    },

    /// A temporary stat delta from a buff, debuff or on-hit effect.
    StatModified {
        target: Side,
        stat: TemporaryStat,
        delta: i32,
    },

    /// End-of-second regen/poison resolution.
    Periodic {
        target: Side,
        outcome: PeriodicOutcome,
        hp_after: u32,
    },

    // ── Encounter flow ──────────────────────────────────────────
    StateChanged { from: GameState, to: GameState },

    EncounterStarted {
        floor: u32,
        enemy: String,
        enemy_hp: u32,
    },

    EncounterWon { floor: u32, enemy: String },

    EncounterLost { floor: u32, enemy: String },

    FloorChanged { from: u32, to: u32 },

    /// Defeat in advance mode falls back to farming.
    ModeChanged { from: CombatMode, to: CombatMode },

    /// Victory on the last floor while advancing.
    AllFloorsCleared { max_floor: u32 },

    LootDropped {
        spell: String,
        ap_value: u32,
        floor: u32,
    },

    // ── Player management ───────────────────────────────────────
    SpellEquipped {
        spell: String,
        kind: SlotKind,
        slot: usize,
        /// Name of the spell that was pushed out, if any.
        replaced: Option<String>,
    },

    SpellUnequipped {
        spell: String,
        kind: SlotKind,
        slot: usize,
    },

    SpellDeconstructed { spell: String, ap_gained: u32 },

    AttributeUpgraded {
        attribute: PrimaryAttribute,
        new_value: u32,
        cost: u32,
    },

    InventorySorted { count: usize },

    // ── Problems ────────────────────────────────────────────────
    /// A command or state request was refused; nothing changed.
    CommandRejected { command: String, reason: String },

    /// The engine recovered from an unexpected condition by pausing.
    Recovered { reason: String },
}

impl GameEvent {
    /// Per-hit combat detail, as opposed to flow and management events.
    pub fn is_combat_detail(&self) -> bool {
        matches!(
            self,
            GameEvent::SpellCast { .. }
                | GameEvent::Hit { .. }
                | GameEvent::Dodged { .. }
                | GameEvent::DoubledAgainstShield { .. }
                | GameEvent::Healed { .. }
                | GameEvent::ShieldGained { .. }
                | GameEvent::PoisonApplied { .. }
                | GameEvent::StatModified { .. }
                | GameEvent::Periodic { .. }
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::SpellCast { caster, spell } => write!(f, "{} casts {}", caster, spell),
            GameEvent::Hit {
                target,
                spell,
                to_hp,
                absorbed_by_shield,
                hp_after,
                ..
            } => write!(
                f,
                "{} hits {} for {} ({} absorbed), HP {}",
                spell, target, to_hp, absorbed_by_shield, hp_after
            ),
            GameEvent::Dodged {
                target,
                spell,
                hit_chance,
            } => write!(f, "{} dodged {} ({}% to hit)", target, spell, hit_chance),
            GameEvent::DoubledAgainstShield { spell, damage } => {
                write!(f, "{} deals double damage vs shields: {}", spell, damage)
            }
            GameEvent::Healed {
                target,
                amount,
                hp_after,
            } => write!(f, "{} healed {} (HP {})", target, amount, hp_after),
            GameEvent::ShieldGained {
                target,
                amount,
                shield_after,
            } => write!(f, "{} gains {} shield ({})", target, amount, shield_after),
            GameEvent::PoisonApplied {
                target,
                label,
                amount,
                poison_per_second,
            } => write!(
                f,
                "{} afflicted with {} {}/s (now {}/s)",
                target, amount, label, poison_per_second
            ),
            GameEvent::StatModified {
                target,
                stat,
                delta,
            } => write!(f, "{} {} {:+}", target, stat.name(), delta),
            GameEvent::Periodic {
                target,
                outcome,
                hp_after,
            } => match outcome {
                PeriodicOutcome::Healed(n) => {
                    write!(f, "{} regenerates {} (HP {})", target, n, hp_after)
                }
                PeriodicOutcome::Drained(n) => {
                    write!(f, "{} takes {} poison damage (HP {})", target, n, hp_after)
                }
                PeriodicOutcome::Unchanged => write!(f, "{} unaffected by periodic effects", target),
            },
            GameEvent::StateChanged { from, to } => write!(f, "state: {} -> {}", from, to),
            GameEvent::EncounterStarted {
                floor,
                enemy,
                enemy_hp,
            } => write!(f, "floor {}: {} appears ({} HP)", floor, enemy, enemy_hp),
            GameEvent::EncounterWon { floor, enemy } => {
                write!(f, "{} defeated on floor {}", enemy, floor)
            }
            GameEvent::EncounterLost { floor, enemy } => {
                write!(f, "defeated by {} on floor {}", enemy, floor)
            }
            GameEvent::FloorChanged { from, to } => write!(f, "floor {} -> {}", from, to),
            GameEvent::ModeChanged { from, to } => write!(f, "combat mode {} -> {}", from, to),
            GameEvent::AllFloorsCleared { max_floor } => {
                write!(f, "all {} floors cleared", max_floor)
            }
            GameEvent::LootDropped {
                spell,
                ap_value,
                floor,
            } => write!(f, "loot from floor {}: {} ({} AP)", floor, spell, ap_value),
            GameEvent::SpellEquipped {
                spell,
                kind,
                slot,
                replaced,
            } => match replaced {
                Some(old) => write!(
                    f,
                    "equipped {} to {} slot {} (replacing {})",
                    spell,
                    kind.name(),
                    slot,
                    old
                ),
                None => write!(f, "equipped {} to {} slot {}", spell, kind.name(), slot),
            },
            GameEvent::SpellUnequipped { spell, kind, slot } => {
                write!(f, "unequipped {} from {} slot {}", spell, kind.name(), slot)
            }
            GameEvent::SpellDeconstructed { spell, ap_gained } => {
                write!(f, "deconstructed {} for {} AP", spell, ap_gained)
            }
            GameEvent::AttributeUpgraded {
                attribute,
                new_value,
                cost,
            } => write!(
                f,
                "{} raised to {} for {} AP",
                attribute.name(),
                new_value,
                cost
            ),
            GameEvent::InventorySorted { count } => write!(f, "sorted {} spells by AP", count),
            GameEvent::CommandRejected { command, reason } => {
                write!(f, "{} rejected: {}", command, reason)
            }
            GameEvent::Recovered { reason } => write!(f, "paused: {}", reason),
        }
    }
}

/// One-way receiver for engine events.
pub trait PresentationSink {
    fn notify(&mut self, event: &GameEvent);
}

impl<S: PresentationSink + ?Sized> PresentationSink for Box<S> {
    fn notify(&mut self, event: &GameEvent) {
        (**self).notify(event);
    }
}

/// Collects every event in order. Useful for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes all collected events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PresentationSink for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing`: combat detail at trace, flow at info,
/// rejections and recoveries at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CommandRejected { .. } | GameEvent::Recovered { .. } => {
                warn!("{}", event)
            }
            GameEvent::StateChanged { .. } => debug!("{}", event),
            e if e.is_combat_detail() => trace!("{}", e),
            e => info!("{}", e),
        }
    }
}

/// Sends every event to two sinks.
#[derive(Debug, Default)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: PresentationSink, B: PresentationSink> PresentationSink for Tee<A, B> {
    fn notify(&mut self, event: &GameEvent) {
        self.first.notify(event);
        self.second.notify(event);
    }
}
