//! Headless driver for a sorcerer session.
//!
//! Usage:
//!   sorcerer [OPTIONS]
//!
//! Examples:
//!   sorcerer --seed 42 --ticks 20000              # Advance with the built-in content
//!   sorcerer --mode farm --auto-manage --json     # Farm floor 1, print a JSON snapshot
//!   RUST_LOG=sorcerer=trace sorcerer --ticks 500  # Every hit and dodge

use clap::{Parser, ValueEnum};
use serde::Serialize;
use sorcerer::character::{Player, PrimaryAttribute};
use sorcerer::content::{builtin_content, ContentCatalog};
use sorcerer::core::{
    CombatMode, EnemySnapshot, GameState, PlayerSnapshot, Session, SessionConfig, TracingSink,
};
use sorcerer::spells::CoreEffectKind;
use sorcerer::{PresentationSink, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Tick-based spellcaster auto-battler, run without a display
#[derive(Parser, Debug)]
#[command(name = "sorcerer")]
#[command(version)]
struct Args {
    /// Session config (JSON). Defaults apply for missing fields.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Content catalogue (JSON). Uses the built-in content when omitted.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// Seed for deterministic runs. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    #[arg(long, value_enum, default_value_t = ModeArg::Advance)]
    mode: ModeArg,

    /// Seconds fed to each tick (clamped by the session)
    #[arg(long, default_value_t = 0.1)]
    tick_seconds: f64,

    /// Between encounters, deconstruct spare loot and buy upgrades
    #[arg(long)]
    auto_manage: bool,

    /// Print the final snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Advance,
    Farm,
}

impl From<ModeArg> for CombatMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Advance => CombatMode::Advance,
            ModeArg::Farm => CombatMode::Farm,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    ticks_run: u64,
    state: GameState,
    floor: u32,
    mode: CombatMode,
    encounters_won: u32,
    encounters_lost: u32,
    player: PlayerSnapshot,
    enemy: Option<EnemySnapshot>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            print_report(&report, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, severity = ?e.severity(), "run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunReport> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load_from_file(path)?,
        None => SessionConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let content = match &args.content {
        Some(path) => ContentCatalog::load_from_file(path)?,
        None => builtin_content(),
    };

    let mut session = Session::new(config, content, TracingSink)?;
    session.initialize()?;
    session.request_battle_start(args.mode.into())?;

    let mut ticks_run = 0;
    let mut encounters_won = 0;
    let mut encounters_lost = 0;
    let mut inventory_len = session.inventory().len();

    while ticks_run < args.ticks && session.is_running() {
        let state = session.advance_tick(args.tick_seconds);
        ticks_run += 1;

        match state {
            GameState::PlayerWonEncounter => encounters_won += 1,
            GameState::PlayerLostEncounter => encounters_lost += 1,
            GameState::ManagementPaused => {
                // Content ran out or the engine recovered; nothing left to fight
                break;
            }
            GameState::AutoBattling if args.auto_manage => {
                if session.inventory().len() > inventory_len {
                    let mode = session.mode();
                    session.request_pause()?;
                    auto_manage(&mut session);
                    session.request_battle_start(mode)?;
                }
                inventory_len = session.inventory().len();
            }
            _ => {}
        }
    }

    info!(ticks_run, encounters_won, encounters_lost, "run finished");
    Ok(RunReport {
        ticks_run,
        state: session.state(),
        floor: session.floor(),
        mode: session.mode(),
        encounters_won,
        encounters_lost,
        player: session.player_snapshot(),
        enemy: session.enemy_snapshot(),
    })
}

/// Deconstructs every unequipped spell, then spends AP on the scaling
/// attribute of the first equipped damage spell.
fn auto_manage<S: PresentationSink>(session: &mut Session<S>) {
    let spare: Vec<usize> = session
        .inventory()
        .iter()
        .enumerate()
        .filter(|(_, entry)| !session.loadout().contains(entry.id))
        .map(|(index, _)| index)
        .collect();
    // Highest index first so earlier indices stay valid
    for index in spare.into_iter().rev() {
        if let Err(e) = session.deconstruct_spell(index) {
            error!(error = %e, index, "auto-manage deconstruct failed");
        }
    }

    let Some(attribute) = damage_scaling_attribute(session.player()) else {
        return;
    };
    while session.player().attribute_points() >= session.player().upgrade_cost(attribute) {
        if session.upgrade_attribute(attribute).is_err() {
            break;
        }
    }
}

fn damage_scaling_attribute(player: &Player) -> Option<PrimaryAttribute> {
    player
        .equipped_spells()
        .filter(|spell| matches!(spell.effect(), CoreEffectKind::Damage { .. }))
        .find_map(|spell| spell.scaling_attribute())
}

fn print_report(report: &RunReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("error: failed to serialize report: {}", e),
        }
        return;
    }

    let player = &report.player;
    println!("Ticks run:      {}", report.ticks_run);
    println!("Final state:    {}", report.state);
    println!("Floor:          {} ({})", report.floor, report.mode);
    println!(
        "Encounters:     {} won, {} lost",
        report.encounters_won, report.encounters_lost
    );
    println!(
        "{}: {}/{} HP, {} shield, {} AP",
        player.name, player.hp, player.max_hp, player.shield, player.attribute_points
    );
    for line in player.attributes.iter().filter(|l| l.effective > 0) {
        println!("  {:<10} {}", line.attribute.name(), line.effective);
    }
    println!("Inventory ({} spells):", player.inventory.len());
    for item in &player.inventory {
        let marker = match item.equipped {
            Some((kind, slot)) => format!(" [{} {}]", kind.name(), slot),
            None => String::new(),
        };
        println!("  {:>2}. {} ({} AP){}", item.index, item.name, item.ap_value, marker);
    }
    if let Some(enemy) = &report.enemy {
        println!("Enemy: {} {}/{} HP", enemy.name, enemy.hp, enemy.max_hp);
    }
}
