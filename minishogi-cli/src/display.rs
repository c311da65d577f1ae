//! Text rendering for boards and outcomes

use minishogi_core::{Action, Board, GameResult, GameState, Piece, Side, Square, BOARD_SIZE};

/// Two-character token for a piece: optional '+', then the kind letter.
/// Lower pieces are lowercase, Upper pieces uppercase.
pub fn piece_token(piece: Piece) -> String {
    let letter = piece.kind.letter();
    let letter = match piece.side {
        Side::Lower => letter,
        Side::Upper => letter.to_ascii_uppercase(),
    };
    if piece.promoted {
        format!("+{}", letter)
    } else {
        format!(" {}", letter)
    }
}

/// Board drawn rank 5 at the top, files a..e left to right
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for row in (1..=BOARD_SIZE).rev() {
        out.push_str(&format!("{} |", row));
        for col in 1..=BOARD_SIZE {
            match board.get(Square::new(col, row)) {
                Some(piece) => out.push_str(&piece_token(piece)),
                None => out.push_str("  "),
            }
            out.push('|');
        }
        out.push('\n');
    }
    out.push_str("    a  b  c  d  e\n");
    out
}

/// Board, hands and side to move
pub fn render_state(state: &GameState) -> String {
    let hand = |side: Side| {
        state
            .player(side)
            .captures
            .iter()
            .map(|k| format!("{:?}", k))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut out = render_board(state.board());
    out.push_str(&format!("Captures UPPER: {}\n", hand(Side::Upper)));
    out.push_str(&format!("Captures lower: {}\n", hand(Side::Lower)));
    out.push_str(&format!("Ply {}, {:?} to move\n", state.ply_count(), state.active_side()));

    let side = state.active_side();
    if state.player(side).in_check && !state.result().is_terminal() {
        out.push_str(&format!("{:?} player is in check!\n", side));
        out.push_str("Available moves:\n");
        for action in escape_listing(state) {
            out.push_str(&format!("{}\n", action));
        }
    }
    out
}

/// Escapes for the side to move: drops first, then moves by origin and destination
pub fn escape_listing(state: &GameState) -> Vec<Action> {
    let escapes = state.escape_candidates(state.active_side());
    let mut moves: Vec<Action> = escapes
        .king_moves
        .iter()
        .chain(escapes.interposing_moves.iter())
        .copied()
        .collect();
    moves.sort();

    let mut listing = escapes.interposing_drops.clone();
    listing.extend(moves);
    listing
}

/// One-line description of a result
pub fn describe_result(result: GameResult) -> String {
    match result {
        GameResult::Ongoing => "Game in progress".to_string(),
        GameResult::Checkmate { winner } => format!("{:?} wins by checkmate", winner),
        GameResult::IllegalAction { winner } => format!("{:?} wins, illegal action", winner),
        GameResult::MoveLimitDraw => "Draw, move limit reached".to_string(),
    }
}
