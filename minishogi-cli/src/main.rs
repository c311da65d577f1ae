//! Minishogi CLI - Command-line interface
//!
//! Commands:
//! - replay: Replay a JSON game record and report the outcome
//! - selfplay: Play seeded random games and report outcomes

mod display;
mod replay_cmd;
mod selfplay_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minishogi")]
#[command(about = "5x5 minishogi rules engine")]
struct Cli {
    /// RNG seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a game record
    Replay(replay_cmd::ReplayArgs),
    /// Play random games
    Selfplay(selfplay_cmd::SelfplayArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG, defaults to warn)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => replay_cmd::run(args),
        Commands::Selfplay(args) => selfplay_cmd::run(args, cli.seed),
    }
}
