//! Spell data model, procedural generation and AP valuation.

pub mod generation;
pub mod starting;
pub mod types;
pub mod valuation;

pub use generation::*;
pub use types::*;
pub use valuation::*;
