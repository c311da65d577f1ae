//! Replay command - play back a JSON game record
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_record(), report_replay()
//! - Level 3: formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use minishogi_core::record::Ply;
use minishogi_core::{GameRecord, GameResult, Replay, Setup};

use crate::display::{describe_result, render_state};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Game record JSON file (setup, config, actions)
    #[arg(long, value_name = "FILE")]
    pub record: PathBuf,

    /// Replace the record's setup with one loaded from this file
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Override the record's ply ceiling
    #[arg(long)]
    pub max_plies: Option<u32>,

    /// Print the board after every ply
    #[arg(long)]
    pub verbose: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
pub fn run(args: ReplayArgs) -> Result<()> {
    let record = load_record(&args)?;

    tracing::info!(
        "Replaying {} actions from setup '{}' (max {} plies)",
        record.actions.len(),
        record.setup.name,
        record.config.max_plies
    );

    if args.verbose && !args.json {
        print_verbose(&record);
    }

    let replay = record.replay();
    report_replay(&replay, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the record and apply command-line overrides
fn load_record(args: &ReplayArgs) -> Result<GameRecord> {
    let mut record = GameRecord::load(&args.record)
        .with_context(|| format!("Failed to load game record: {}", args.record.display()))?;

    if let Some(path) = &args.setup {
        record.setup = Setup::load(path)
            .with_context(|| format!("Failed to load setup: {}", path.display()))?;
    }
    if let Some(max_plies) = args.max_plies {
        record.config = record.config.with_max_plies(max_plies);
    }

    Ok(record)
}

/// Report the outcome
fn report_replay(replay: &Replay, args: &ReplayArgs) {
    if args.json {
        print_json(replay);
    } else {
        print_text(replay);
    }
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

/// Replay ply by ply, printing the position after each one
fn print_verbose(record: &GameRecord) {
    let mut state = minishogi_core::GameState::from_setup(&record.setup, record.config);
    println!("{}", render_state(&state));
    for &action in &record.actions {
        let result = state.apply_action(action);
        println!("> {}", action);
        println!("{}", render_state(&state));
        if result.is_terminal() {
            break;
        }
    }
}

fn print_json(replay: &Replay) {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        result: GameResult,
        winner: Option<String>,
        plies: &'a [Ply],
        skipped: usize,
    }

    let result = replay.state.result();
    let output = JsonOutput {
        result,
        winner: result.winner().map(|s| format!("{:?}", s)),
        plies: &replay.plies,
        skipped: replay.skipped,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text(replay: &Replay) {
    println!("{}", render_state(&replay.state));
    println!("{}", describe_result(replay.state.result()));
    if replay.skipped > 0 {
        println!("({} actions after the end were ignored)", replay.skipped);
    }
}
