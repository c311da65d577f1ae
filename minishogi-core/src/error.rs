//! Error taxonomy
//!
//! Neither error type aborts anything on its own. A bad placement is logged
//! and skipped at setup. An illegal action ends the game and the acting side
//! forfeits.

use crate::board::Square;
use crate::pieces::{Piece, PieceKind};

/// Why an initial placement was skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("piece {piece:?} not placed: square {square:?} is off the board")]
    OutOfBounds { piece: Piece, square: Square },

    #[error("piece {piece:?} not placed: {square:?} is already occupied")]
    Occupied { piece: Piece, square: Square },

    #[error("piece {piece:?} not placed: side already has a king")]
    DuplicateKing { piece: Piece, square: Square },

    #[error("piece {piece:?} cannot be promoted")]
    Malformed { piece: Piece, square: Square },
}

/// Why an action was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalAction {
    #[error("game is already over")]
    GameOver,

    #[error("square {0:?} is off the board")]
    OutOfBounds(Square),

    #[error("no piece at {0:?}")]
    EmptyOrigin(Square),

    #[error("piece at {0:?} belongs to the opponent")]
    NotYourPiece(Square),

    #[error("destination {0:?} holds one of your own pieces")]
    SelfCapture(Square),

    #[error("piece at {from:?} cannot reach {to:?}")]
    Unreachable { from: Square, to: Square },

    #[error("king would be attacked on {0:?}")]
    KingIntoCheck(Square),

    #[error("promotion not allowed from {from:?} to {to:?}")]
    InvalidPromotion { from: Square, to: Square },

    #[error("drop square {0:?} is occupied")]
    OccupiedDrop(Square),

    #[error("no {0:?} in hand")]
    NotInHand(PieceKind),

    #[error("file of {0:?} already has an unpromoted pawn")]
    DoublePawn(Square),

    #[error("pawn cannot be dropped on the last rank ({0:?})")]
    PawnDropLastRank(Square),

    #[error("pawn dropped on {0:?} would attack the king")]
    PawnDropCheck(Square),

    #[error("side is in check and the action is not an escape")]
    MustEscapeCheck,
}
