//! Session orchestration: state machine, tick scheduling, events,
//! configuration and the command layer.

pub mod command;
pub mod config;
pub mod constants;
pub mod events;
pub mod game_state;
pub mod session;
pub mod snapshot;
pub mod tick;

pub use command::*;
pub use config::*;
pub use events::*;
pub use game_state::*;
pub use session::*;
pub use snapshot::*;
pub use tick::*;
