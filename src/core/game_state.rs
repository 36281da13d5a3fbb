use serde::{Deserialize, Serialize};
use std::fmt;

/// Combat session state machine.
///
/// `Initializing -> ManagementPaused <-> StartingNewFloor -> AutoBattling ->
/// {PlayerWonEncounter | PlayerLostEncounter} -> StartingNewFloor`, with
/// `GameOver` terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Initializing,
    ManagementPaused,
    StartingNewFloor,
    AutoBattling,
    PlayerWonEncounter,
    PlayerLostEncounter,
    GameOver,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::GameOver)
    }

    /// States in which combat is running or about to run.
    pub fn is_in_battle_loop(&self) -> bool {
        matches!(
            self,
            GameState::StartingNewFloor
                | GameState::AutoBattling
                | GameState::PlayerWonEncounter
                | GameState::PlayerLostEncounter
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Initializing => "initializing",
            GameState::ManagementPaused => "paused",
            GameState::StartingNewFloor => "starting new floor",
            GameState::AutoBattling => "auto-battling",
            GameState::PlayerWonEncounter => "encounter won",
            GameState::PlayerLostEncounter => "encounter lost",
            GameState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// What happens to the floor counter after an encounter resolves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CombatMode {
    /// Climb one floor per victory.
    #[default]
    Advance,
    /// Stay on the current floor.
    Farm,
}

impl fmt::Display for CombatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatMode::Advance => f.write_str("advance"),
            CombatMode::Farm => f.write_str("farm"),
        }
    }
}
