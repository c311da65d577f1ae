//! Selfplay command - random legal games
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use minishogi_core::{GameConfig, GameRecord, GameResult, GameState, Setup, Side};

use crate::display::describe_result;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Starting position JSON file (standard position if omitted)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Ply ceiling before a game is drawn
    #[arg(long, default_value_t = minishogi_core::config::DEFAULT_MAX_PLIES)]
    pub max_plies: u32,

    /// Write the last game as a replayable record
    #[arg(long, value_name = "FILE")]
    pub save_last: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    result: GameResult,
    plies: u32,
    record: GameRecord,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct SelfplayResults {
    games: Vec<GameSummary>,
    lower_wins: usize,
    upper_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let setup = match &args.setup {
        Some(path) => Setup::load(path)
            .with_context(|| format!("Failed to load setup: {}", path.display()))?,
        None => Setup::standard(),
    };
    let config = GameConfig::default().with_max_plies(args.max_plies);

    tracing::info!("Playing {} random games from '{}'", args.games, setup.name);

    let results = play_games(&setup, config, args.games, seed);

    if let (Some(path), Some(last)) = (&args.save_last, results.games.last()) {
        last.record
            .save(path)
            .with_context(|| format!("Failed to save record: {}", path.display()))?;
        tracing::info!("Saved game {} to {}", last.game_number, path.display());
    }

    report_results(&results, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(setup: &Setup, config: GameConfig, games: usize, seed: Option<u64>) -> SelfplayResults {
    let mut rng = create_rng(seed);
    let mut summaries = Vec::with_capacity(games);

    for game_num in 0..games {
        let summary = play_single_game(setup, config, game_num + 1, &mut rng);
        tracing::info!(
            "Game {}: {:?} ({} plies)",
            summary.game_number,
            summary.result,
            summary.plies
        );
        summaries.push(summary);
    }

    compute_statistics(summaries)
}

fn report_results(results: &SelfplayResults, args: &SelfplayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play random legal actions until the game ends
fn play_single_game(setup: &Setup, config: GameConfig, game_number: usize, rng: &mut ChaCha8Rng) -> GameSummary {
    let mut state = GameState::from_setup(setup, config);
    let mut record = GameRecord::new(setup.clone(), config);

    while !state.result().is_terminal() {
        match state.random_action(rng) {
            Some(action) => {
                state.apply_action(action);
                record.actions.push(action);
            }
            None => {
                // Only reachable when the side to move has no legal action
                // outside of check, which the rules leave undecided.
                tracing::warn!("Game {}: {:?} has no legal action", game_number, state.active_side());
                break;
            }
        }
    }

    GameSummary {
        game_number,
        result: state.result(),
        plies: state.ply_count(),
        record,
    }
}

fn compute_statistics(games: Vec<GameSummary>) -> SelfplayResults {
    let wins = |side: Side| games.iter().filter(|g| g.result.winner() == Some(side)).count();
    let lower_wins = wins(Side::Lower);
    let upper_wins = wins(Side::Upper);
    let draws = games.len() - lower_wins - upper_wins;

    let total_plies: u32 = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    SelfplayResults {
        games,
        lower_wins,
        upper_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn print_json_results(results: &SelfplayResults) {
    #[derive(Serialize)]
    struct JsonGame {
        game_number: usize,
        result: GameResult,
        plies: u32,
    }

    #[derive(Serialize)]
    struct JsonOutput {
        total_games: usize,
        lower_wins: usize,
        upper_wins: usize,
        draws: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        lower_wins: results.lower_wins,
        upper_wins: results.upper_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: g.result,
                plies: g.plies,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &SelfplayResults) {
    println!("\n=== Selfplay Results ===");
    println!("Total games: {}", results.games.len());
    println!("Lower wins:  {}", results.lower_wins);
    println!("Upper wins:  {}", results.upper_wins);
    println!("Draws:       {}", results.draws);
    println!("Avg plies:   {:.1}", results.avg_plies);

    for g in &results.games {
        println!("  Game {:>3}: {} ({} plies)", g.game_number, describe_result(g.result), g.plies);
    }
}
