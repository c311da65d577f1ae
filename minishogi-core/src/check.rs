//! Check detection and checkmate verification
//!
//! After every action the engine asks whether the mover now attacks the
//! opponent king. If so it enumerates every candidate escape (king moves,
//! moves onto an attack ray, drops onto an attack ray) and simulates each one
//! on a copy of the board. Candidates that leave the king attacked are
//! discarded; when nothing survives the position is checkmate.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::game::Action;
use crate::hand::CaptureHand;
use crate::legality::{must_promote, validate_drop};
use crate::movegen::{attack_ray, attackers_of, attacks, pseudo_legal_destinations, reach};
use crate::pieces::{Piece, Side};

/// Verified ways out of check, each list sorted by square order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapeSet {
    pub king_moves: Vec<Action>,
    pub interposing_moves: Vec<Action>,
    pub interposing_drops: Vec<Action>,
}

impl EscapeSet {
    pub fn is_empty(&self) -> bool {
        self.king_moves.is_empty() && self.interposing_moves.is_empty() && self.interposing_drops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.king_moves.len() + self.interposing_moves.len() + self.interposing_drops.len()
    }

    /// All escapes: drops first, then king moves, then interposing moves
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.interposing_drops
            .iter()
            .chain(self.king_moves.iter())
            .chain(self.interposing_moves.iter())
    }

    /// Whether `action` is one of the escapes. Moves match on (from, to);
    /// the promotion choice does not affect whether the king is safe.
    pub fn allows(&self, action: &Action) -> bool {
        match *action {
            Action::Move { from, to, .. } => self
                .king_moves
                .iter()
                .chain(self.interposing_moves.iter())
                .any(|a| matches!(*a, Action::Move { from: f, to: t, .. } if f == from && t == to)),
            Action::Drop { .. } => self.interposing_drops.contains(action),
        }
    }
}

/// Result of evaluating one side's king after the opponent acted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    Safe,
    Check(EscapeSet),
    Checkmate,
}

/// Whether `side`'s king is currently attacked
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .map_or(false, |king| attacks(board, side.opponent(), king))
}

/// Evaluate the defender's king after `attacker` has just acted.
///
/// `defender_hand` supplies the drop candidates.
pub fn evaluate(board: &Board, defender_hand: &CaptureHand, attacker: Side) -> CheckStatus {
    let defender = attacker.opponent();
    let king = match board.king_square(defender) {
        Some(k) => k,
        None => return CheckStatus::Safe,
    };

    if !reach(board, attacker, false).contains(&king) {
        return CheckStatus::Safe;
    }

    let candidates = escape_candidates(board, defender_hand, attacker, king);
    let escapes = verify(board, attacker, king, candidates);

    if escapes.is_empty() {
        CheckStatus::Checkmate
    } else {
        CheckStatus::Check(escapes)
    }
}

// ============================================================================
// CANDIDATE ENUMERATION
// ============================================================================

/// Every action that might relieve the check, before simulation
fn escape_candidates(board: &Board, hand: &CaptureHand, attacker: Side, king: Square) -> EscapeSet {
    let defender = attacker.opponent();
    let coverage = reach(board, attacker, true);

    let king_piece = match board.get(king) {
        Some(p) => p,
        None => return EscapeSet::default(),
    };
    let king_moves = pseudo_legal_destinations(board, king, king_piece, false)
        .into_iter()
        .filter(|to| !coverage.contains(to))
        .map(|to| Action::Move { from: king, to, promote: false })
        .collect();

    // Sliding checkers contribute their whole ray; stepping checkers can only
    // be captured, so their ray is just their own square.
    let ray_squares: FxHashSet<Square> = attackers_of(board, attacker, king)
        .into_iter()
        .flat_map(|checker| attack_ray(board, checker, king).unwrap_or_else(|| vec![checker]))
        .collect();

    let mut interposing_moves = Vec::new();
    for (from, piece) in board.side_pieces(defender) {
        if piece.is_king() {
            continue;
        }
        for to in pseudo_legal_destinations(board, from, piece, false) {
            if ray_squares.contains(&to) {
                let promote = must_promote(piece, to);
                interposing_moves.push(Action::Move { from, to, promote });
            }
        }
    }

    let mut drop_squares: Vec<Square> = ray_squares
        .iter()
        .copied()
        .filter(|&sq| board.is_empty_at(sq))
        .collect();
    drop_squares.sort_unstable();

    let mut interposing_drops = Vec::new();
    for to in drop_squares {
        for kind in hand.kinds() {
            if validate_drop(board, hand, defender, kind, to).is_ok() {
                interposing_drops.push(Action::Drop { kind, to });
            }
        }
    }

    EscapeSet {
        king_moves,
        interposing_moves,
        interposing_drops,
    }
}

// ============================================================================
// SIMULATION
// ============================================================================

/// Keep the candidates after which the attacker no longer reaches the king
fn verify(board: &Board, attacker: Side, king: Square, candidates: EscapeSet) -> EscapeSet {
    let defender = attacker.opponent();
    let keep = |actions: Vec<Action>| -> Vec<Action> {
        actions
            .into_par_iter()
            .filter(|action| relieves_check(board, attacker, defender, king, action))
            .collect()
    };

    EscapeSet {
        king_moves: keep(candidates.king_moves),
        interposing_moves: keep(candidates.interposing_moves),
        interposing_drops: keep(candidates.interposing_drops),
    }
}

/// Apply `action` to a copy of the board and test the king's new square
fn relieves_check(board: &Board, attacker: Side, defender: Side, king: Square, action: &Action) -> bool {
    let mut after = board.clone();
    let king_after = match *action {
        Action::Move { from, to, promote } => {
            after.move_piece(from, to, promote);
            if from == king {
                to
            } else {
                king
            }
        }
        Action::Drop { kind, to } => {
            after.place(to, Piece::new(kind, defender));
            king
        }
    };
    !attacks(&after, attacker, king_after)
}
