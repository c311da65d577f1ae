//! Minishogi Core - 5x5 shogi rules engine
//!
//! This crate provides the rules of 5x5 minishogi:
//! - Board geometry (files a..e, ranks 1..5)
//! - Piece kinds, promotion and movement tables
//! - Move generation with a trace mode for attack coverage
//! - Legality filtering for moves and drops
//! - Check detection with verified escape sets
//! - Game state and the turn engine
//! - JSON setups and game records

pub mod board;
pub mod pieces;
pub mod movegen;
pub mod legality;
pub mod hand;
pub mod check;
pub mod game;
pub mod setup;
pub mod record;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Square, BOARD_SIZE};
pub use pieces::{Piece, PieceKind, Side};
pub use hand::CaptureHand;
pub use check::{CheckStatus, EscapeSet};
pub use game::{Action, GameResult, GameState, PlayerState};
pub use setup::{Placement, Setup};
pub use record::{GameRecord, Replay};
pub use config::GameConfig;
pub use error::{IllegalAction, SetupError};

/// Parse a square name like "c3" (test helper)
#[cfg(test)]
pub(crate) fn sq(name: &str) -> Square {
    let bytes = name.as_bytes();
    Square::new((bytes[0] - b'a') as i8 + 1, (bytes[1] - b'0') as i8)
}
