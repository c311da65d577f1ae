//! Game state and the turn engine

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::check::{self, CheckStatus, EscapeSet};
use crate::config::GameConfig;
use crate::error::SetupError;
use crate::hand::CaptureHand;
use crate::legality::{can_promote, check_action};
use crate::movegen::pseudo_legal_destinations;
use crate::pieces::{Piece, PieceKind, Side};
use crate::setup::{Placement, Setup};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A structured action from the side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move {
        from: Square,
        to: Square,
        #[serde(default)]
        promote: bool,
    },
    Drop {
        kind: PieceKind,
        to: Square,
    },
}

impl Action {
    pub fn destination(&self) -> Square {
        match *self {
            Action::Move { to, .. } | Action::Drop { to, .. } => to,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Action::Move { from, to, promote: false } => write!(f, "move {} {}", from, to),
            Action::Move { from, to, promote: true } => write!(f, "move {} {} promote", from, to),
            Action::Drop { kind, to } => write!(f, "drop {} {}", kind.letter(), to),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    Checkmate { winner: Side },
    IllegalAction { winner: Side },
    MoveLimitDraw,
}

impl GameResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }

    /// Winner (None for ongoing games and draws)
    pub fn winner(&self) -> Option<Side> {
        match *self {
            GameResult::Checkmate { winner } | GameResult::IllegalAction { winner } => Some(winner),
            GameResult::Ongoing | GameResult::MoveLimitDraw => None,
        }
    }
}

/// Per-side state
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub side: Side,
    /// Square -> piece for this side, mirrored from the board
    pub pieces: FxHashMap<Square, Piece>,
    pub captures: CaptureHand,
    pub in_check: bool,
    pub in_checkmate: bool,
    /// Verified escapes while `in_check`
    pub pending_escape: Option<EscapeSet>,
}

impl PlayerState {
    fn new(side: Side, board: &Board, captures: CaptureHand) -> Self {
        Self {
            side,
            pieces: board.side_pieces(side).collect(),
            captures,
            in_check: false,
            in_checkmate: false,
            pending_escape: None,
        }
    }

    /// Square of this side's king, from the piece map
    pub fn king_square(&self) -> Option<Square> {
        self.pieces
            .iter()
            .find(|(_, p)| p.is_king())
            .map(|(&sq, _)| sq)
    }

    fn clear_check(&mut self) {
        self.in_check = false;
        self.in_checkmate = false;
        self.pending_escape = None;
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete game state (owned by one game; clone to branch)
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    players: [PlayerState; 2],
    active: Side,
    ply_count: u32,
    result: GameResult,
    config: GameConfig,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a game from the standard position or from placements.
    ///
    /// Asking for a custom game without placements falls back to the
    /// standard position. Unplaceable pieces are skipped with a warning.
    pub fn new_game(default: bool, placements: Option<&[Placement]>, config: GameConfig) -> Self {
        match (default, placements) {
            (false, Some(placements)) if !placements.is_empty() => {
                let setup = Setup {
                    name: "custom".to_string(),
                    placements: placements.to_vec(),
                    ..Setup::empty()
                };
                Self::from_setup(&setup, config)
            }
            (false, _) => {
                tracing::warn!("No placements given for custom game, using standard position");
                Self::from_setup(&Setup::standard(), config)
            }
            (true, _) => Self::from_setup(&Setup::standard(), config),
        }
    }

    /// Create a game from a setup record (placements plus starting hands)
    pub fn from_setup(setup: &Setup, config: GameConfig) -> Self {
        let mut board = Board::empty();
        for placement in &setup.placements {
            if let Err(e) = place_checked(&mut board, placement) {
                tracing::warn!("{}", e);
            }
        }

        let hand_for = |side: Side| {
            CaptureHand::from_kinds(setup.captures(side).iter().copied().filter(|&k| {
                if k == PieceKind::King {
                    tracing::warn!("Ignoring king in {:?} starting hand", side);
                    return false;
                }
                true
            }))
        };

        let lower = PlayerState::new(Side::Lower, &board, hand_for(Side::Lower));
        let upper = PlayerState::new(Side::Upper, &board, hand_for(Side::Upper));

        Self {
            board,
            players: [lower, upper],
            active: Side::Lower,
            ply_count: 0,
            result: GameResult::Ongoing,
            config,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, side: Side) -> &PlayerState {
        &self.players[side.index()]
    }

    fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        &mut self.players[side.index()]
    }

    /// Side to move
    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Verified escapes for `side` (empty when not in check)
    pub fn escape_candidates(&self, side: Side) -> EscapeSet {
        self.player(side).pending_escape.clone().unwrap_or_default()
    }

    // ========================================================================
    // ACTION GENERATION
    // ========================================================================

    /// Every legal action for the side to move, in square order
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.result.is_terminal() {
            return vec![];
        }

        let side = self.active;
        let mut candidates = Vec::new();

        for (from, piece) in self.board.side_pieces(side) {
            for to in pseudo_legal_destinations(&self.board, from, piece, false) {
                candidates.push(Action::Move { from, to, promote: false });
                if can_promote(piece, from, to) {
                    candidates.push(Action::Move { from, to, promote: true });
                }
            }
        }

        for kind in self.player(side).captures.kinds() {
            for to in Square::all().filter(|&sq| self.board.is_empty_at(sq)) {
                candidates.push(Action::Drop { kind, to });
            }
        }

        candidates.retain(|a| check_action(self, a).map_or(false, |resolved| resolved == *a));
        candidates
    }

    /// Pick a uniformly random legal action
    pub fn random_action<R: Rng>(&self, rng: &mut R) -> Option<Action> {
        self.legal_actions().choose(rng).copied()
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Functional form of `apply_action`: returns the successor state
    pub fn after(&self, action: Action) -> (Self, GameResult) {
        let mut next = self.clone();
        let result = next.apply_action(action);
        (next, result)
    }

    /// Validate and apply one action, then evaluate check.
    ///
    /// An illegal action ends the game in favour of the opponent. Terminal
    /// games ignore further actions.
    pub fn apply_action(&mut self, action: Action) -> GameResult {
        if self.result.is_terminal() {
            tracing::debug!("Ignoring {:?}: game already over ({:?})", action, self.result);
            return self.result;
        }

        let mover = self.active;
        let resolved = match check_action(self, &action) {
            Ok(resolved) => resolved,
            Err(reason) => {
                tracing::debug!("{:?} rejected {:?}: {}", mover, action, reason);
                self.result = GameResult::IllegalAction { winner: mover.opponent() };
                tracing::info!("{:?} wins: illegal action", mover.opponent());
                return self.result;
            }
        };

        let captured_king = self.apply_resolved(mover, resolved);
        self.ply_count += 1;
        self.player_mut(mover).clear_check();

        if captured_king {
            self.result = GameResult::Checkmate { winner: mover };
            tracing::info!("{:?} wins: king captured", mover);
            return self.result;
        }

        self.evaluate_check(mover);

        if !self.result.is_terminal() && self.ply_count >= self.config.max_plies {
            self.result = GameResult::MoveLimitDraw;
            tracing::info!("Draw: reached {} plies", self.ply_count);
        }

        if !self.result.is_terminal() {
            self.active = mover.opponent();
        }

        self.result
    }

    /// Mutate board, piece maps and hands. Returns true if a king was taken.
    fn apply_resolved(&mut self, mover: Side, action: Action) -> bool {
        match action {
            Action::Move { from, to, promote } => {
                let captured = self.board.move_piece(from, to, promote);

                let moved = self.board.get(to);
                let player = self.player_mut(mover);
                player.pieces.remove(&from);
                if let Some(piece) = moved {
                    player.pieces.insert(to, piece);
                }

                match captured {
                    Some(piece) => {
                        self.player_mut(mover.opponent()).pieces.remove(&to);
                        if piece.is_king() {
                            return true;
                        }
                        self.player_mut(mover).captures.capture(piece);
                        false
                    }
                    None => false,
                }
            }
            Action::Drop { kind, to } => {
                let piece = Piece::new(kind, mover);
                self.board.place(to, piece);
                let player = self.player_mut(mover);
                player.captures.remove(kind);
                player.pieces.insert(to, piece);
                false
            }
        }
    }

    /// Run the check engine for the side that did not just move
    fn evaluate_check(&mut self, mover: Side) {
        let defender = mover.opponent();
        let status = check::evaluate(&self.board, &self.player(defender).captures, mover);

        let player = self.player_mut(defender);
        player.clear_check();
        match status {
            CheckStatus::Safe => {}
            CheckStatus::Check(escapes) => {
                tracing::debug!("{:?} in check with {} escapes", defender, escapes.len());
                player.in_check = true;
                player.pending_escape = Some(escapes);
            }
            CheckStatus::Checkmate => {
                player.in_check = true;
                player.in_checkmate = true;
                self.result = GameResult::Checkmate { winner: mover };
                tracing::info!("{:?} wins: checkmate", mover);
            }
        }
    }
}

/// Put one placement on the board, refusing anything that breaks board invariants
fn place_checked(board: &mut Board, placement: &Placement) -> Result<(), SetupError> {
    let Placement { piece, square } = *placement;

    if !square.is_valid() {
        return Err(SetupError::OutOfBounds { piece, square });
    }
    if !piece.is_well_formed() {
        return Err(SetupError::Malformed { piece, square });
    }
    if !board.is_empty_at(square) {
        return Err(SetupError::Occupied { piece, square });
    }
    if piece.is_king() && board.king_square(piece.side).is_some() {
        return Err(SetupError::DuplicateKing { piece, square });
    }

    board.place(square, piece);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
