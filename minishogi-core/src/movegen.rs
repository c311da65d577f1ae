//! Pseudo-legal destination generation and attack tracing
//!
//! Normal mode yields squares a piece may move to: empty squares and
//! opponent-occupied squares. Trace mode also yields squares held by the
//! mover's own pieces (a ray still stops there). It is used only to work out
//! which squares a side covers during check analysis.

use rustc_hash::FxHashSet;

use crate::board::{Board, Square};
use crate::pieces::{direction_vectors, Piece, Side};

/// Destinations of `piece` standing on `origin`, sorted by file then rank
pub fn pseudo_legal_destinations(board: &Board, origin: Square, piece: Piece, trace: bool) -> Vec<Square> {
    let movement = piece.movement();
    let mut dests = Vec::with_capacity(16);

    for (dcol, drow) in direction_vectors(piece.side, movement.steps) {
        let target = origin.offset(dcol, drow);
        if !target.is_valid() {
            continue;
        }
        match board.get(target) {
            Some(occupant) if occupant.side == piece.side && !trace => {}
            _ => dests.push(target),
        }
    }

    for (dcol, drow) in direction_vectors(piece.side, movement.slides) {
        trace_ray(board, origin, piece.side, (dcol, drow), trace, &mut dests);
    }

    dests.sort_unstable();
    dests.dedup();
    dests
}

/// Walk one ray from `origin`, pushing squares until the edge or a blocker
fn trace_ray(
    board: &Board,
    origin: Square,
    side: Side,
    (dcol, drow): (i8, i8),
    trace: bool,
    dests: &mut Vec<Square>,
) {
    let mut current = origin;
    loop {
        current = current.offset(dcol, drow);
        if !current.is_valid() {
            break;
        }

        if let Some(occupant) = board.get(current) {
            if occupant.side != side || trace {
                dests.push(current);
            }
            break; // Blocked
        }

        dests.push(current);
    }
}

/// Union of destinations over all of a side's pieces
pub fn reach(board: &Board, side: Side, trace: bool) -> FxHashSet<Square> {
    board
        .side_pieces(side)
        .flat_map(|(sq, piece)| pseudo_legal_destinations(board, sq, piece, trace))
        .collect()
}

/// Whether any piece of `side` reaches `target` (non-trace)
pub fn attacks(board: &Board, side: Side, target: Square) -> bool {
    board
        .side_pieces(side)
        .any(|(sq, piece)| pseudo_legal_destinations(board, sq, piece, false).contains(&target))
}

/// Squares of `side`'s pieces that reach `target` (non-trace)
pub fn attackers_of(board: &Board, side: Side, target: Square) -> Vec<Square> {
    board
        .side_pieces(side)
        .filter(|&(sq, piece)| pseudo_legal_destinations(board, sq, piece, false).contains(&target))
        .map(|(sq, _)| sq)
        .collect()
}

// ============================================================================
// ATTACK TRACER
// ============================================================================

/// Attack ray of a sliding piece toward `king`: the attacker's own square
/// followed by every square strictly between it and the king.
///
/// Returns None when the piece on `attacker` is not a slider or none of its
/// slides reaches the king unobstructed.
pub fn attack_ray(board: &Board, attacker: Square, king: Square) -> Option<Vec<Square>> {
    let piece = board.get(attacker)?;
    if !piece.kind.is_slider() {
        return None;
    }

    for (dcol, drow) in direction_vectors(piece.side, piece.movement().slides) {
        let mut ray = vec![attacker];
        let mut current = attacker;
        loop {
            current = current.offset(dcol, drow);
            if !current.is_valid() {
                break;
            }
            if current == king {
                return Some(ray);
            }
            if board.get(current).is_some() {
                break;
            }
            ray.push(current);
        }
    }

    None
}
