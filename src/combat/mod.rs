//! Combatants, the damage pipeline and spell effect resolution.

pub mod combatant;
pub mod damage;
pub mod effects;
pub mod enemy;

pub use combatant::*;
pub use damage::*;
pub use effects::*;
pub use enemy::*;
