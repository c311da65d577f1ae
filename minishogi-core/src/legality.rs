//! Legality filter and promotion rule

use crate::board::{Board, Square};
use crate::error::IllegalAction;
use crate::game::{Action, GameState};
use crate::hand::CaptureHand;
use crate::movegen::{attacks, pseudo_legal_destinations};
use crate::pieces::{Piece, PieceKind, Side};

// ============================================================================
// PROMOTION
// ============================================================================

/// Piece may promote when the move starts or ends on the opponent's back rank
pub fn can_promote(piece: Piece, from: Square, to: Square) -> bool {
    let zone = piece.side.promotion_row();
    !piece.promoted && piece.kind.can_promote() && (from.row == zone || to.row == zone)
}

/// A pawn reaching the last rank always promotes
pub fn must_promote(piece: Piece, to: Square) -> bool {
    piece.kind == PieceKind::Pawn && !piece.promoted && to.row == piece.side.promotion_row()
}

// ============================================================================
// BOARD-LEVEL CHECKS
// ============================================================================

/// Validate a board move for `side`. Returns whether the piece ends up promoted.
///
/// Only King moves are checked for self-check. Moving any other piece off a
/// line that shields its own King is not detected.
pub fn validate_move(
    board: &Board,
    side: Side,
    from: Square,
    to: Square,
    promote: bool,
) -> Result<bool, IllegalAction> {
    if !from.is_valid() {
        return Err(IllegalAction::OutOfBounds(from));
    }
    if !to.is_valid() {
        return Err(IllegalAction::OutOfBounds(to));
    }

    let piece = board.get(from).ok_or(IllegalAction::EmptyOrigin(from))?;
    if piece.side != side {
        return Err(IllegalAction::NotYourPiece(from));
    }
    if board.get(to).map_or(false, |target| target.side == side) {
        return Err(IllegalAction::SelfCapture(to));
    }
    if !pseudo_legal_destinations(board, from, piece, false).contains(&to) {
        return Err(IllegalAction::Unreachable { from, to });
    }
    if piece.is_king() && king_exposed_after(board, side, from, to) {
        return Err(IllegalAction::KingIntoCheck(to));
    }
    if promote && !can_promote(piece, from, to) {
        return Err(IllegalAction::InvalidPromotion { from, to });
    }

    Ok(promote || must_promote(piece, to))
}

/// Whether the king moving `from` -> `to` would stand on an attacked square
fn king_exposed_after(board: &Board, side: Side, from: Square, to: Square) -> bool {
    let mut after = board.clone();
    after.move_piece(from, to, false);
    attacks(&after, side.opponent(), to)
}

/// Validate dropping `kind` from `hand` onto `to`
pub fn validate_drop(
    board: &Board,
    hand: &CaptureHand,
    side: Side,
    kind: PieceKind,
    to: Square,
) -> Result<(), IllegalAction> {
    if !to.is_valid() {
        return Err(IllegalAction::OutOfBounds(to));
    }
    if !board.is_empty_at(to) {
        return Err(IllegalAction::OccupiedDrop(to));
    }
    if !hand.contains(kind) {
        return Err(IllegalAction::NotInHand(kind));
    }
    if kind == PieceKind::Pawn {
        can_drop_pawn(board, side, to)?;
    }
    Ok(())
}

/// Pawn-specific drop restrictions
///
/// The last-rank ban applies to drops only. The drop-check test looks one
/// ply ahead through the pawn's own forward square, not a full mate proof.
pub fn can_drop_pawn(board: &Board, side: Side, to: Square) -> Result<(), IllegalAction> {
    if board.has_pawn_in_file(side, to.col) {
        return Err(IllegalAction::DoublePawn(to));
    }
    if to.row == side.promotion_row() {
        return Err(IllegalAction::PawnDropLastRank(to));
    }

    let ahead = to.offset(0, side.forward());
    let threatens_king = board
        .get(ahead)
        .map_or(false, |p| p.is_king() && p.side != side);
    if threatens_king {
        return Err(IllegalAction::PawnDropCheck(to));
    }

    Ok(())
}

// ============================================================================
// GAME-LEVEL FILTER
// ============================================================================

/// Check an action against the current game state.
///
/// On success returns the action as it will be applied, with forced
/// promotion filled in.
pub fn check_action(state: &GameState, action: &Action) -> Result<Action, IllegalAction> {
    if state.result().is_terminal() {
        return Err(IllegalAction::GameOver);
    }

    let side = state.active_side();
    let player = state.player(side);

    let resolved = match *action {
        Action::Move { from, to, promote } => {
            let promote = validate_move(state.board(), side, from, to, promote)?;
            Action::Move { from, to, promote }
        }
        Action::Drop { kind, to } => {
            validate_drop(state.board(), &player.captures, side, kind, to)?;
            Action::Drop { kind, to }
        }
    };

    // Taking the opposing king ends the game even while in check
    if player.in_check && !captures_king(state.board(), side, &resolved) {
        let escapes = player.pending_escape.as_ref();
        if !escapes.map_or(false, |e| e.allows(&resolved)) {
            return Err(IllegalAction::MustEscapeCheck);
        }
    }

    Ok(resolved)
}

/// Whether a move lands on the opposing king
fn captures_king(board: &Board, side: Side, action: &Action) -> bool {
    match *action {
        Action::Move { to, .. } => board.get(to).map_or(false, |p| p.is_king() && p.side != side),
        Action::Drop { .. } => false,
    }
}

/// Boolean form of `check_action`
pub fn is_legal(state: &GameState, action: &Action) -> bool {
    check_action(state, action).is_ok()
}
