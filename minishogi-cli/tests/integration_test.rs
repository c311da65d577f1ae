//! Integration tests for the minishogi rules engine
//!
//! Tests the full stack: setup, turn engine, check evaluation, records and
//! seeded random play.

use minishogi_core::{
    check::is_in_check,
    legality::{validate_drop, validate_move},
    movegen::pseudo_legal_destinations,
    Action, GameConfig, GameRecord, GameResult, GameState, Piece, PieceKind, Placement, Setup, Side,
    Square,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Parse "c3" style square names
fn sq(name: &str) -> Square {
    let bytes = name.as_bytes();
    Square::new((bytes[0] - b'a') as i8 + 1, (bytes[1] - b'0') as i8)
}

fn mv(from: &str, to: &str) -> Action {
    Action::Move { from: sq(from), to: sq(to), promote: false }
}

fn place(kind: PieceKind, side: Side, name: &str) -> Placement {
    Placement::new(kind, side, sq(name))
}

fn setup_with(placements: Vec<Placement>, lower_hand: Vec<PieceKind>) -> Setup {
    Setup {
        name: "test".to_string(),
        placements,
        lower_captures: lower_hand,
        upper_captures: vec![],
    }
}

fn standard_game() -> GameState {
    GameState::new_game(true, None, GameConfig::default())
}

/// Total pieces on the board plus pieces in both hands
fn material(state: &GameState) -> usize {
    state.board().pieces().count()
        + state.player(Side::Lower).captures.len()
        + state.player(Side::Upper).captures.len()
}

/// Every action `side` could legally make on the board, ignoring the
/// pending escape restriction
fn board_level_actions(state: &GameState, side: Side) -> Vec<Action> {
    let board = state.board();
    let mut actions = Vec::new();

    for (from, piece) in board.side_pieces(side) {
        for to in pseudo_legal_destinations(board, from, piece, false) {
            if let Ok(promote) = validate_move(board, side, from, to, false) {
                actions.push(Action::Move { from, to, promote });
            }
        }
    }

    let hand = &state.player(side).captures;
    for kind in hand.kinds() {
        for to in Square::all() {
            if validate_drop(board, hand, side, kind, to).is_ok() {
                actions.push(Action::Drop { kind, to });
            }
        }
    }

    actions
}

/// Apply an action to a copy of the board only, bypassing the turn engine
fn simulate(state: &GameState, side: Side, action: Action) -> minishogi_core::Board {
    let mut board = state.board().clone();
    match action {
        Action::Move { from, to, promote } => {
            board.move_piece(from, to, promote);
        }
        Action::Drop { kind, to } => {
            board.place(to, Piece::new(kind, side));
        }
    }
    board
}

/// A declared checkmate must leave the loser with no action that frees the king
fn assert_checkmate_sound(state: &GameState, loser: Side) {
    if state.board().king_square(loser).is_none() {
        // King was captured outright
        return;
    }
    assert!(is_in_check(state.board(), loser), "mated side must be in check");

    for action in board_level_actions(state, loser) {
        let board = simulate(state, loser, action);
        assert!(
            is_in_check(&board, loser),
            "{:?} escapes a declared checkmate with {:?}",
            loser,
            action
        );
    }
}

// ============================================================================
// BASIC SCENARIOS
// ============================================================================

#[test]
fn test_default_pawn_push() {
    let mut game = standard_game();
    let before = game.board().clone();

    let result = game.apply_action(mv("a4", "a3"));

    assert_eq!(result, GameResult::Ongoing);
    assert_eq!(game.board().get(sq("a3")), Some(Piece::new(PieceKind::Pawn, Side::Lower)));
    assert!(game.board().get(sq("a4")).is_none());

    let changed: Vec<_> = Square::all()
        .filter(|&s| before.get(s) != game.board().get(s))
        .collect();
    assert_eq!(changed, vec![sq("a3"), sq("a4")]);
    assert!(game.player(Side::Lower).captures.is_empty());
    assert!(!game.player(Side::Upper).in_check);
}

#[test]
fn test_king_checked_by_rook_on_open_file() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "a1"),
            place(PieceKind::Pawn, Side::Lower, "d3"),
            place(PieceKind::Rook, Side::Upper, "b5"),
            place(PieceKind::King, Side::Upper, "e5"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    game.apply_action(mv("d3", "d2"));
    game.apply_action(mv("b5", "a5"));

    let lower = game.player(Side::Lower);
    assert!(lower.in_check);
    assert!(!lower.in_checkmate);

    let escapes = game.escape_candidates(Side::Lower);
    assert!(!escapes.king_moves.is_empty());
    for action in &escapes.king_moves {
        assert_ne!(action.destination().col, 1, "escape {:?} stays on the a-file", action);
    }
}

#[test]
fn test_double_pawn_drop_rejected() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Pawn, Side::Lower, "a4"),
            place(PieceKind::King, Side::Upper, "c1"),
        ],
        vec![PieceKind::Pawn],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());
    let before = game.board().clone();

    let result = game.apply_action(Action::Drop { kind: PieceKind::Pawn, to: sq("a2") });

    assert_eq!(result, GameResult::IllegalAction { winner: Side::Upper });
    assert_eq!(game.board(), &before);
    assert_eq!(game.player(Side::Lower).captures.count(PieceKind::Pawn), 1);
}

#[test]
fn test_empty_origin_ends_game() {
    let mut game = standard_game();
    let result = game.apply_action(mv("c3", "c2"));
    assert_eq!(result, GameResult::IllegalAction { winner: Side::Upper });
    assert!(game.result().is_terminal());
}

#[test]
fn test_capture_is_not_reversible() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Gold, Side::Lower, "c4"),
            place(PieceKind::Pawn, Side::Upper, "c3"),
            place(PieceKind::King, Side::Upper, "a1"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());
    let board_before = game.board().clone();
    let hand_before = game.player(Side::Lower).captures.clone();

    game.apply_action(mv("c4", "c3"));
    game.apply_action(mv("a1", "a2"));
    let result = game.apply_action(mv("c3", "c4"));

    assert_eq!(result, GameResult::Ongoing);
    assert_eq!(game.board().get(sq("c4")), board_before.get(sq("c4")));
    assert!(game.board().get(sq("c3")).is_none());
    assert_ne!(game.player(Side::Lower).captures, hand_before);
    assert_eq!(game.player(Side::Lower).captures.count(PieceKind::Pawn), 1);
}

#[test]
fn test_promoted_capture_enters_hand_demoted() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Rook, Side::Lower, "b5"),
            Placement { piece: Piece::new_promoted(PieceKind::Pawn, Side::Upper), square: sq("b3") },
            place(PieceKind::King, Side::Upper, "e1"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    game.apply_action(mv("b5", "b3"));

    let hand: Vec<_> = game.player(Side::Lower).captures.iter().collect();
    assert_eq!(hand, vec![PieceKind::Pawn]);
}

#[test]
fn test_drop_after_capture() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Rook, Side::Lower, "b5"),
            place(PieceKind::Silver, Side::Upper, "b3"),
            place(PieceKind::King, Side::Upper, "e1"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    game.apply_action(mv("b5", "b3"));
    game.apply_action(mv("e1", "d1"));
    let result = game.apply_action(Action::Drop { kind: PieceKind::Silver, to: sq("c3") });

    assert_eq!(result, GameResult::Ongoing);
    assert_eq!(game.board().get(sq("c3")), Some(Piece::new(PieceKind::Silver, Side::Lower)));
    assert!(game.player(Side::Lower).captures.is_empty());
}

#[test]
fn test_move_limit_draw() {
    let mut game = GameState::new_game(true, None, GameConfig::default().with_max_plies(4));
    let actions = [mv("a4", "a3"), mv("b2", "b3"), mv("a5", "a4"), mv("a1", "b2")];

    let results: Vec<_> = actions.iter().map(|&a| game.apply_action(a)).collect();

    assert_eq!(results[2], GameResult::Ongoing);
    assert_eq!(results[3], GameResult::MoveLimitDraw);
    assert_eq!(game.ply_count(), 4);
}

// ============================================================================
// CHECKMATE
// ============================================================================

#[test]
fn test_gold_and_rook_checkmate() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Rook, Side::Lower, "b5"),
            place(PieceKind::Gold, Side::Lower, "b3"),
            place(PieceKind::King, Side::Upper, "a1"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    let result = game.apply_action(mv("b3", "b2"));

    assert_eq!(result, GameResult::Checkmate { winner: Side::Lower });
    assert_checkmate_sound(&game, Side::Upper);
}

#[test]
fn test_pinned_piece_may_expose_king() {
    // Only king moves are screened, so the gold may leave the e-file
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Gold, Side::Lower, "e4"),
            place(PieceKind::Rook, Side::Upper, "e1"),
            place(PieceKind::King, Side::Upper, "a1"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    assert_eq!(game.apply_action(mv("e4", "d3")), GameResult::Ongoing);
    assert!(is_in_check(game.board(), Side::Lower));

    let result = game.apply_action(mv("e1", "e5"));
    assert_eq!(result, GameResult::Checkmate { winner: Side::Upper });
    assert!(game.board().king_square(Side::Lower).is_none());
    assert!(!game.player(Side::Upper).captures.contains(PieceKind::King));
}

#[test]
fn test_king_capture_overrides_pending_check() {
    let setup = setup_with(
        vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Gold, Side::Lower, "e4"),
            place(PieceKind::Rook, Side::Upper, "e1"),
            place(PieceKind::King, Side::Upper, "c2"),
        ],
        vec![],
    );
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    assert_eq!(game.apply_action(mv("e4", "d3")), GameResult::Ongoing);
    assert!(game.player(Side::Upper).in_check);

    let result = game.apply_action(mv("e1", "e5"));
    assert_eq!(result, GameResult::Checkmate { winner: Side::Upper });
}

#[test]
fn test_drop_interposition_avoids_mate() {
    // Lower rook gives check down the a-file; Upper may block with its silver
    let setup = Setup {
        name: "interpose".to_string(),
        placements: vec![
            place(PieceKind::King, Side::Lower, "e5"),
            place(PieceKind::Rook, Side::Lower, "b4"),
            place(PieceKind::Gold, Side::Lower, "c3"),
            place(PieceKind::King, Side::Upper, "a1"),
        ],
        lower_captures: vec![],
        upper_captures: vec![PieceKind::Silver],
    };
    let mut game = GameState::from_setup(&setup, GameConfig::default());

    let result = game.apply_action(mv("b4", "a4"));
    assert_eq!(result, GameResult::Ongoing);

    let escapes = game.escape_candidates(Side::Upper);
    assert!(escapes.interposing_drops.contains(&Action::Drop { kind: PieceKind::Silver, to: sq("a2") }));

    // A non-escape is rejected
    let mut wrong = game.clone();
    assert_eq!(
        wrong.apply_action(Action::Drop { kind: PieceKind::Silver, to: sq("d4") }),
        GameResult::IllegalAction { winner: Side::Lower }
    );

    let result = game.apply_action(Action::Drop { kind: PieceKind::Silver, to: sq("a3") });
    assert_eq!(result, GameResult::Ongoing);
    assert!(!game.player(Side::Upper).in_check);
}

#[test]
fn test_replay_record_from_file() {
    let mut record = GameRecord::new(Setup::standard(), GameConfig::default());
    record.actions = vec![mv("a4", "a3"), mv("b2", "b3"), mv("a3", "a2")];

    let path = std::env::temp_dir().join(format!("minishogi-record-{}.json", std::process::id()));
    record.save(&path).unwrap();
    let loaded = GameRecord::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let replay = loaded.replay();
    assert_eq!(replay.state.ply_count(), 3);
    assert_eq!(replay.state.result(), GameResult::Ongoing);
    assert_eq!(replay.state.board().get(sq("a2")), Some(Piece::new(PieceKind::Pawn, Side::Lower)));
}

// ============================================================================
// RANDOM PLAYOUTS
// ============================================================================

#[test]
fn test_random_playouts_hold_invariants() {
    let config = GameConfig::default().with_max_plies(200);

    for seed in 0..12u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = GameState::new_game(true, None, config);
        let start_material = material(&game);

        while !game.result().is_terminal() {
            let action = match game.random_action(&mut rng) {
                Some(a) => a,
                None => break,
            };
            let mover = game.active_side();
            let was_in_check = game.player(mover).in_check;
            let king_move = matches!(action, Action::Move { from, .. }
                if game.board().get(from).map_or(false, |p| p.is_king()));

            let result = game.apply_action(action);
            assert!(
                !matches!(result, GameResult::IllegalAction { .. }),
                "seed {}: generated action {:?} was rejected",
                seed,
                action
            );

            // Mirrored piece maps match the board
            for side in [Side::Lower, Side::Upper] {
                let from_board: Vec<_> = game.board().side_pieces(side).collect();
                assert_eq!(from_board.len(), game.player(side).pieces.len());
                for (square, piece) in from_board {
                    assert_eq!(game.player(side).pieces.get(&square), Some(&piece));
                }
                assert!(!game.player(side).captures.contains(PieceKind::King));
            }

            if game.board().king_square(mover.opponent()).is_some() {
                assert_eq!(material(&game), start_material, "seed {}: material changed", seed);
            }
            let kings_on_board = game.board().king_square(mover).is_some()
                && game.board().king_square(mover.opponent()).is_some();
            if (king_move || was_in_check) && kings_on_board {
                assert!(!is_in_check(game.board(), mover), "seed {}: {:?} left in check", seed, mover);
            }
            if let GameResult::Checkmate { winner } = result {
                assert_checkmate_sound(&game, winner.opponent());
            }
        }

        assert!(game.ply_count() <= 200);
    }
}

#[test]
fn test_seeded_playouts_reproducible() {
    let play = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = GameState::new_game(true, None, GameConfig::default().with_max_plies(60));
        let mut actions = Vec::new();
        while let Some(action) = game.random_action(&mut rng) {
            game.apply_action(action);
            actions.push(action);
        }
        (actions, game.result())
    };

    assert_eq!(play(42), play(42));
}
