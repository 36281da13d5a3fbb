//! The combat session: state machine, floor progression and the command
//! surface the outer loop drives.
//!
//! A session is single-threaded and advances only when the caller invokes
//! [`Session::advance_tick`]. Each call performs one step of the state
//! machine, so every state change is visible to the caller between ticks.

use super::command::{Command, CommandOutcome};
use super::config::SessionConfig;
use super::constants::FIRST_FLOOR;
use super::events::{GameEvent, PresentationSink};
use super::game_state::{CombatMode, GameState};
use super::snapshot::{EnemySnapshot, PlayerSnapshot};
use super::tick::{combat_tick, EncounterStatus};
use crate::character::attributes::PrimaryAttribute;
use crate::character::inventory::{Inventory, SpellId};
use crate::character::loadout::{Loadout, SlotKind};
use crate::character::player::Player;
use crate::combat::combatant::Combatant;
use crate::combat::enemy::Enemy;
use crate::content::{builtin_content, ContentSource};
use crate::error::{CommandError, GameError, Result};
use crate::spells::generation::SpellGenerator;
use crate::spells::starting::starting_spells;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Mixed into the seed so loot rolls don't mirror dodge rolls.
const LOOT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct Session<S: PresentationSink> {
    config: SessionConfig,
    content: Box<dyn ContentSource>,
    generator: SpellGenerator,
    player: Player,
    enemy: Option<Enemy>,
    state: GameState,
    floor: u32,
    mode: CombatMode,
    periodic_accumulator: f64,
    combat_rng: StdRng,
    loot_rng: StdRng,
    sink: S,
}

impl<S: PresentationSink> Session<S> {
    /// Builds a session in `Initializing`. Call [`Session::initialize`]
    /// before anything else.
    pub fn new(
        config: SessionConfig,
        content: impl ContentSource + 'static,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        let generator = SpellGenerator::new(content.spell_templates(), content.enchantments())?;
        let (combat_rng, loot_rng) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed ^ LOOT_SEED_SALT),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        Ok(Self {
            player: Player::new(config.player_name.clone()),
            floor: config.starting_floor,
            config,
            content: Box::new(content),
            generator,
            enemy: None,
            state: GameState::Initializing,
            mode: CombatMode::default(),
            periodic_accumulator: 0.0,
            combat_rng,
            loot_rng,
            sink,
        })
    }

    /// Session over the compiled-in content.
    pub fn with_builtin_content(config: SessionConfig, sink: S) -> Result<Self> {
        Self::new(config, builtin_content(), sink)
    }

    /// Gives the player the starting spells, loads the first enemy and
    /// enters `ManagementPaused`. Missing content for the starting floor
    /// ends the game.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != GameState::Initializing {
            return Err(self.invalid_state("initialize"));
        }

        for (slot, spell) in starting_spells().into_iter().enumerate() {
            self.player.add_spell(spell);
            let index = self.player.inventory().len() - 1;
            self.player.equip_spell(index, SlotKind::Active, slot)?;
        }

        let Some(enemy) = self.content.enemy_for_floor(self.floor) else {
            let err = GameError::ContentMissing(format!("no enemy for floor {}", self.floor));
            self.emit(GameEvent::Recovered {
                reason: err.to_string(),
            });
            self.transition(GameState::GameOver);
            return Err(err);
        };
        self.enemy = Some(enemy);
        self.reset_combatants();

        info!(
            player = %self.player.name,
            floor = self.floor,
            max_floor = self.config.max_floor,
            seed = ?self.config.seed,
            "session initialized"
        );
        self.transition(GameState::ManagementPaused);
        Ok(())
    }

    /// Performs one step of the state machine and returns the state after it.
    ///
    /// `delta_seconds` is clamped into `[0, max_tick_seconds]`.
    pub fn advance_tick(&mut self, delta_seconds: f64) -> GameState {
        let delta = if delta_seconds.is_finite() {
            delta_seconds.clamp(0.0, self.config.max_tick_seconds)
        } else {
            0.0
        };

        match self.state {
            GameState::AutoBattling => self.process_combat_tick(delta),
            GameState::PlayerWonEncounter => self.handle_victory(),
            GameState::PlayerLostEncounter => self.handle_defeat(),
            GameState::StartingNewFloor => self.start_encounter(),
            GameState::Initializing | GameState::ManagementPaused | GameState::GameOver => {}
        }
        self.state
    }

    /// Leaves management and starts fighting on the current floor.
    /// Choosing a mode here is the only way out of a defeat's farm fallback.
    pub fn request_battle_start(&mut self, mode: CombatMode) -> Result<()> {
        if self.state != GameState::ManagementPaused {
            return Err(self.invalid_state("battle"));
        }
        if self.content.enemy_for_floor(self.floor).is_none() {
            let err = GameError::ContentMissing(format!("no enemy for floor {}", self.floor));
            return Err(self.reject("battle", err));
        }

        self.set_mode(mode);
        self.transition(GameState::StartingNewFloor);
        Ok(())
    }

    /// Pauses a running battle. The encounter restarts from full on resume.
    pub fn request_pause(&mut self) -> Result<()> {
        if self.state != GameState::AutoBattling {
            return Err(self.invalid_state("pause"));
        }
        self.transition(GameState::ManagementPaused);
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn mode(&self) -> CombatMode {
        self.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn inventory(&self) -> &Inventory {
        self.player.inventory()
    }

    pub fn loadout(&self) -> &Loadout {
        self.player.loadout()
    }

    pub fn player_snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::capture(&self.player)
    }

    pub fn enemy_snapshot(&self) -> Option<EnemySnapshot> {
        self.enemy.as_ref().map(EnemySnapshot::capture)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ── Player management (ManagementPaused only) ───────────────

    pub fn equip_spell(
        &mut self,
        inventory_index: usize,
        kind: SlotKind,
        slot: usize,
    ) -> Result<Option<SpellId>> {
        self.require_paused("equip")?;
        let displaced = match self.player.equip_spell(inventory_index, kind, slot) {
            Ok(displaced) => displaced,
            Err(e) => return Err(self.reject("equip", e)),
        };

        let inventory = self.player.inventory();
        let spell = inventory
            .get(inventory_index)
            .map(|e| e.spell.name().to_string())
            .unwrap_or_default();
        let replaced = displaced
            .and_then(|id| inventory.get_by_id(id))
            .map(|s| s.name().to_string());
        self.emit(GameEvent::SpellEquipped {
            spell,
            kind,
            slot,
            replaced,
        });
        Ok(displaced)
    }

    pub fn unequip_spell(&mut self, kind: SlotKind, slot: usize) -> Result<SpellId> {
        self.require_paused("unequip")?;
        let removed = match self.player.unequip_spell(kind, slot) {
            Ok(id) => id,
            Err(e) => return Err(self.reject("unequip", e)),
        };
        let spell = self.spell_name(removed);
        self.emit(GameEvent::SpellUnequipped { spell, kind, slot });
        Ok(removed)
    }

    /// Destroys an unequipped inventory spell for its AP value.
    pub fn deconstruct_spell(&mut self, inventory_index: usize) -> Result<u32> {
        self.require_paused("deconstruct")?;
        let spell = self
            .player
            .inventory()
            .get(inventory_index)
            .map(|e| e.spell.name().to_string())
            .unwrap_or_default();
        let ap_gained = match self.player.deconstruct_spell(inventory_index) {
            Ok(ap) => ap,
            Err(e) => return Err(self.reject("deconstruct", e)),
        };
        self.emit(GameEvent::SpellDeconstructed { spell, ap_gained });
        Ok(ap_gained)
    }

    /// Buys one point of `attribute`. Returns the AP spent.
    pub fn upgrade_attribute(&mut self, attribute: PrimaryAttribute) -> Result<u32> {
        self.require_paused("upgrade")?;
        let cost = match self.player.upgrade_attribute(attribute) {
            Ok(cost) => cost,
            Err(e) => return Err(self.reject("upgrade", e)),
        };
        self.emit(GameEvent::AttributeUpgraded {
            attribute,
            new_value: self.player.attributes().get(attribute),
            cost,
        });
        Ok(cost)
    }

    /// Name-based variant for command layers that take free text.
    pub fn upgrade_attribute_by_name(&mut self, name: &str) -> Result<u32> {
        match name.parse::<PrimaryAttribute>() {
            Ok(attribute) => self.upgrade_attribute(attribute),
            Err(e) => Err(self.reject("upgrade", e)),
        }
    }

    pub fn sort_inventory(&mut self) -> Result<()> {
        self.require_paused("sort")?;
        self.player.sort_inventory_by_ap_value();
        self.emit(GameEvent::InventorySorted {
            count: self.player.inventory().len(),
        });
        Ok(())
    }

    /// Runs a parsed [`Command`].
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        let outcome = match command {
            Command::Battle(mode) => {
                self.request_battle_start(mode)?;
                CommandOutcome::BattleStarted(mode)
            }
            Command::Stop => {
                self.request_pause()?;
                CommandOutcome::Paused
            }
            Command::Equip {
                inventory_index,
                kind,
                slot,
            } => {
                let displaced = self.equip_spell(inventory_index, kind, slot)?;
                CommandOutcome::Equipped {
                    replaced: displaced.map(|id| self.spell_name(id)),
                }
            }
            Command::Unequip { kind, slot } => {
                let id = self.unequip_spell(kind, slot)?;
                CommandOutcome::Unequipped {
                    spell: self.spell_name(id),
                }
            }
            Command::Deconstruct { inventory_index } => CommandOutcome::Deconstructed {
                ap_gained: self.deconstruct_spell(inventory_index)?,
            },
            Command::Upgrade(attribute) => {
                let cost = self.upgrade_attribute(attribute)?;
                CommandOutcome::Upgraded {
                    new_value: self.player.attributes().get(attribute),
                    cost,
                }
            }
            Command::Sort => {
                self.sort_inventory()?;
                CommandOutcome::Sorted
            }
        };
        Ok(outcome)
    }

    // ── State machine steps ─────────────────────────────────────

    fn process_combat_tick(&mut self, delta: f64) {
        let Some(enemy) = self.enemy.as_mut() else {
            self.recover(GameError::InvariantViolation(
                "combat tick without an enemy".to_string(),
            ));
            return;
        };

        let result = combat_tick(
            &mut self.player,
            enemy,
            &mut self.periodic_accumulator,
            delta,
            &mut self.combat_rng,
        );
        for event in &result.events {
            self.sink.notify(event);
        }

        match result.status {
            EncounterStatus::Ongoing => {}
            EncounterStatus::PlayerWon => self.transition(GameState::PlayerWonEncounter),
            EncounterStatus::PlayerLost => self.transition(GameState::PlayerLostEncounter),
        }
    }

    fn start_encounter(&mut self) {
        self.player.reset_combat_state();
        let Some(mut enemy) = self.content.enemy_for_floor(self.floor) else {
            self.recover(GameError::ContentMissing(format!(
                "no enemy for floor {}",
                self.floor
            )));
            return;
        };
        enemy.reset_combat_state();
        self.emit(GameEvent::EncounterStarted {
            floor: self.floor,
            enemy: enemy.name().to_string(),
            enemy_hp: enemy.current_hp(),
        });
        self.enemy = Some(enemy);
        self.periodic_accumulator = 0.0;
        self.transition(GameState::AutoBattling);
    }

    fn handle_victory(&mut self) {
        self.emit(GameEvent::EncounterWon {
            floor: self.floor,
            enemy: self.enemy_name(),
        });

        let loot = self.generator.generate(self.floor, &mut self.loot_rng);
        self.emit(GameEvent::LootDropped {
            spell: loot.name().to_string(),
            ap_value: loot.ap_value,
            floor: self.floor,
        });
        self.player.add_spell(loot);

        if self.mode == CombatMode::Advance {
            if self.floor >= self.config.max_floor {
                self.emit(GameEvent::AllFloorsCleared {
                    max_floor: self.config.max_floor,
                });
                self.transition(GameState::GameOver);
                return;
            }
            self.change_floor(self.floor + 1);
        }
        self.transition(GameState::StartingNewFloor);
    }

    fn handle_defeat(&mut self) {
        self.emit(GameEvent::EncounterLost {
            floor: self.floor,
            enemy: self.enemy_name(),
        });
        if self.mode == CombatMode::Advance {
            self.set_mode(CombatMode::Farm);
        }
        self.change_floor(self.floor.saturating_sub(1).max(FIRST_FLOOR));
        self.transition(GameState::StartingNewFloor);
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn reset_combatants(&mut self) {
        self.player.reset_combat_state();
        if let Some(enemy) = self.enemy.as_mut() {
            enemy.reset_combat_state();
        }
        self.periodic_accumulator = 0.0;
    }

    fn emit(&mut self, event: GameEvent) {
        self.sink.notify(&event);
    }

    fn transition(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        debug!(%from, %to, floor = self.floor, "state transition");
        self.state = to;
        self.emit(GameEvent::StateChanged { from, to });
    }

    fn set_mode(&mut self, mode: CombatMode) {
        if self.mode != mode {
            let from = self.mode;
            self.mode = mode;
            self.emit(GameEvent::ModeChanged { from, to: mode });
        }
    }

    fn change_floor(&mut self, to: u32) {
        if self.floor != to {
            let from = self.floor;
            self.floor = to;
            self.emit(GameEvent::FloorChanged { from, to });
        }
    }

    /// Pauses after an unexpected condition instead of propagating it.
    fn recover(&mut self, err: GameError) {
        warn!(error = %err, state = %self.state, "recovering by pausing");
        self.emit(GameEvent::Recovered {
            reason: err.to_string(),
        });
        self.transition(GameState::ManagementPaused);
    }

    fn reject(&mut self, command: &str, err: impl Into<GameError>) -> GameError {
        let err = err.into();
        self.emit(GameEvent::CommandRejected {
            command: command.to_string(),
            reason: err.to_string(),
        });
        err
    }

    fn invalid_state(&mut self, request: &'static str) -> GameError {
        let current = self.state;
        self.reject(request, CommandError::InvalidState { request, current })
    }

    fn require_paused(&mut self, request: &'static str) -> Result<()> {
        if self.state == GameState::ManagementPaused {
            Ok(())
        } else {
            Err(self.invalid_state(request))
        }
    }

    fn spell_name(&self, id: SpellId) -> String {
        self.player
            .inventory()
            .get_by_id(id)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn enemy_name(&self) -> String {
        self.enemy
            .as_ref()
            .map(|e| e.name().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentCatalog;
    use crate::core::events::EventLog;

    fn seeded() -> SessionConfig {
        SessionConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    fn ready_session() -> Session<EventLog> {
        let mut session = Session::with_builtin_content(seeded(), EventLog::new()).unwrap();
        session.initialize().unwrap();
        session
    }

    #[test]
    fn test_initialize_equips_starting_spells() {
        let session = ready_session();
        assert_eq!(session.state(), GameState::ManagementPaused);
        assert_eq!(session.floor(), 1);
        assert_eq!(session.inventory().len(), 2);
        assert_eq!(session.player().active_spell(0).unwrap().name(), "Singe");
        assert_eq!(session.player().active_spell(1).unwrap().name(), "Minor Heal");
        assert_eq!(session.enemy().unwrap().id(), "CELLAR_RAT");
    }

    #[test]
    fn test_initialize_twice_rejected() {
        let mut session = ready_session();
        assert!(matches!(
            session.initialize(),
            Err(GameError::InvalidCommand(CommandError::InvalidState { .. }))
        ));
        assert_eq!(session.inventory().len(), 2);
    }

    #[test]
    fn test_initialize_without_enemies_is_game_over() {
        let content = ContentCatalog {
            enemies: Vec::new(),
            ..builtin_content()
        };
        let mut session = Session::new(seeded(), content, EventLog::new()).unwrap();
        assert!(matches!(
            session.initialize(),
            Err(GameError::ContentMissing(_))
        ));
        assert_eq!(session.state(), GameState::GameOver);
        assert!(!session.is_running());
    }

    #[test]
    fn test_new_rejects_content_without_templates() {
        let content = ContentCatalog {
            spell_templates: Vec::new(),
            ..builtin_content()
        };
        assert!(matches!(
            Session::new(seeded(), content, EventLog::new()),
            Err(GameError::Content(_))
        ));
    }

    #[test]
    fn test_battle_start_then_encounter() {
        let mut session = ready_session();
        session.request_battle_start(CombatMode::Advance).unwrap();
        assert_eq!(session.state(), GameState::StartingNewFloor);
        assert_eq!(session.advance_tick(0.1), GameState::AutoBattling);
        assert!(session
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::EncounterStarted { floor: 1, .. })));
    }

    #[test]
    fn test_pause_only_while_battling() {
        let mut session = ready_session();
        assert!(session.request_pause().is_err());
        assert!(matches!(
            session.sink().events().last(),
            Some(GameEvent::CommandRejected { .. })
        ));

        session.request_battle_start(CombatMode::Farm).unwrap();
        assert!(session.request_pause().is_err());
        session.advance_tick(0.1);
        session.request_pause().unwrap();
        assert_eq!(session.state(), GameState::ManagementPaused);
        assert_eq!(session.mode(), CombatMode::Farm);
    }

    #[test]
    fn test_management_rejected_while_battling() {
        let mut session = ready_session();
        session.request_battle_start(CombatMode::Farm).unwrap();
        session.advance_tick(0.1);
        assert!(matches!(
            session.sort_inventory(),
            Err(GameError::InvalidCommand(CommandError::InvalidState {
                request: "sort",
                current: GameState::AutoBattling
            }))
        ));
    }

    #[test]
    fn test_missing_enemy_mid_battle_recovers() {
        let mut session = ready_session();
        session.request_battle_start(CombatMode::Farm).unwrap();
        session.advance_tick(0.1);
        session.enemy = None;

        assert_eq!(session.advance_tick(0.1), GameState::ManagementPaused);
        assert!(session
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::Recovered { .. })));
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut session = ready_session();
        session.request_battle_start(CombatMode::Farm).unwrap();
        session.advance_tick(0.1);
        // A huge delta must not fire the 3.5s Singe in one tick
        session.advance_tick(100.0);
        let remaining = session.loadout().active(0).unwrap().remaining;
        assert!((remaining - 3.4).abs() < 1e-9);
    }

    #[test]
    fn test_execute_parsed_commands() {
        let mut session = ready_session();
        let outcome = session.execute("sort".parse().unwrap()).unwrap();
        assert_eq!(outcome, CommandOutcome::Sorted);

        let err = session.execute("dec 0".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidCommand(CommandError::SpellEquipped { .. })
        ));
    }
}
