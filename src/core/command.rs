//! Text command layer for the management screen.
//!
//! Parsing is separate from execution: [`Command::from_str`] turns a line
//! like `equip 3 active 0` into a [`Command`], and the session executes it.

use crate::character::attributes::PrimaryAttribute;
use crate::character::loadout::SlotKind;
use crate::core::game_state::CombatMode;
use crate::error::CommandError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Battle(CombatMode),
    Stop,
    Equip {
        inventory_index: usize,
        kind: SlotKind,
        slot: usize,
    },
    Unequip { kind: SlotKind, slot: usize },
    Deconstruct { inventory_index: usize },
    Upgrade(PrimaryAttribute),
    Sort,
}

/// What a successfully executed command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    BattleStarted(CombatMode),
    Paused,
    Equipped { replaced: Option<String> },
    Unequipped { spell: String },
    Deconstructed { ap_gained: u32 },
    Upgraded { new_value: u32, cost: u32 },
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Invalid(#[from] CommandError),
}

fn parse_index(token: Option<&str>, usage: &'static str) -> Result<usize, ParseCommandError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(ParseCommandError::Usage(usage))
}

fn parse_kind(token: Option<&str>, usage: &'static str) -> Result<SlotKind, ParseCommandError> {
    match token {
        Some("active") | Some("a") => Ok(SlotKind::Active),
        Some("passive") | Some("p") => Ok(SlotKind::Passive),
        _ => Err(ParseCommandError::Usage(usage)),
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let lowered = line.trim().to_lowercase();
        let mut parts = lowered.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(ParseCommandError::Empty);
        };

        let command = match verb {
            "battle" => {
                const USAGE: &str = "battle <advance|farm>";
                match parts.next() {
                    Some("advance") => Command::Battle(CombatMode::Advance),
                    Some("farm") => Command::Battle(CombatMode::Farm),
                    _ => return Err(ParseCommandError::Usage(USAGE)),
                }
            }
            "stop" => Command::Stop,
            "equip" => {
                const USAGE: &str = "equip <inv_idx> <active|passive> <slot_idx>";
                Command::Equip {
                    inventory_index: parse_index(parts.next(), USAGE)?,
                    kind: parse_kind(parts.next(), USAGE)?,
                    slot: parse_index(parts.next(), USAGE)?,
                }
            }
            "unequip" => {
                const USAGE: &str = "unequip <active|passive> <slot_idx>";
                Command::Unequip {
                    kind: parse_kind(parts.next(), USAGE)?,
                    slot: parse_index(parts.next(), USAGE)?,
                }
            }
            "deconstruct" | "dec" => Command::Deconstruct {
                inventory_index: parse_index(parts.next(), "deconstruct <inv_idx>")?,
            },
            "upgrade" | "upg" => {
                let name = parts
                    .next()
                    .ok_or(ParseCommandError::Usage("upgrade <attribute>"))?;
                Command::Upgrade(name.parse::<PrimaryAttribute>()?)
            }
            "sort" => Command::Sort,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
