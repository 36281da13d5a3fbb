//! Error types for the combat and loot engine.
//!
//! Every rejecting operation validates its inputs before touching any state,
//! so an `Err` always means "nothing changed".

use crate::core::game_state::GameState;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

/// How a caller is expected to react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The session can keep going (e.g. pause and retry later).
    Recoverable,
    /// Bad input from the command layer; reject and carry on.
    Validation,
    /// Engine state did not match expectations.
    Internal,
    /// The session cannot continue.
    Fatal,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("content missing: {0}")]
    ContentMissing(String),

    #[error("invalid command: {0}")]
    InvalidCommand(#[from] CommandError),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GameError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GameError::ContentMissing(_) => ErrorSeverity::Recoverable,
            GameError::InvalidCommand(_) => ErrorSeverity::Validation,
            GameError::InvariantViolation(_) => ErrorSeverity::Internal,
            GameError::Content(_) | GameError::Config(_) => ErrorSeverity::Fatal,
        }
    }
}

/// Rejections from the player-management and state-request surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("{kind} slot {index} does not exist")]
    InvalidSlot { kind: &'static str, index: usize },

    #[error("{kind} slot {index} is empty")]
    EmptySlot { kind: &'static str, index: usize },

    #[error("no spell at inventory index {index} (inventory holds {len})")]
    InvalidInventoryIndex { index: usize, len: usize },

    #[error("{name} is already equipped")]
    AlreadyEquipped { name: String },

    #[error("{name} is equipped and cannot be deconstructed")]
    SpellEquipped { name: String },

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("not enough AP: need {cost}, have {available}")]
    InsufficientAp { cost: u32, available: u32 },

    #[error("{request} is not allowed while {current:?}")]
    InvalidState {
        request: &'static str,
        current: GameState,
    },
}

/// Failures while loading or validating content definitions.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid content: {0}")]
    Invalid(String),

    #[error("on-hit key '{0}' names more than one stat")]
    AmbiguousOnHit(String),

    #[error("on-hit key '{0}' names no known stat")]
    UnknownOnHit(String),
}
