//! Sorcerer - tick-based spellcaster auto-battler engine.
//!
//! The library holds the combat resolution pipeline, the procedural spell
//! generator and the session state machine. Presentation is left to a
//! [`crate::core::PresentationSink`]; the `sorcerer` binary drives a session
//! headlessly.

pub mod character;
pub mod combat;
pub mod content;
pub mod core;
pub mod error;
pub mod spells;

pub use crate::core::{GameEvent, GameState, PresentationSink, Session, SessionConfig};
pub use crate::error::{GameError, Result};
