//! Player attributes, derived stats, spell ownership and loadout.

pub mod attributes;
pub mod derived_stats;
pub mod inventory;
pub mod loadout;
pub mod player;

pub use attributes::*;
pub use derived_stats::*;
pub use inventory::*;
pub use loadout::*;
pub use player::*;
