//! Board geometry and the 5x5 piece grid

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, PieceKind, Side};

/// Number of files and ranks
pub const BOARD_SIZE: i8 = 5;

/// Board coordinate: column 1..=5 (files a..e) and row 1..=5 (ranks)
///
/// Squares order by file, then rank, which is the order every generated
/// destination list is sorted in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub col: i8,
    pub row: i8,
}

impl Square {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (1..=BOARD_SIZE).contains(&self.col) && (1..=BOARD_SIZE).contains(&self.row)
    }

    /// Square shifted by (dcol, drow); may fall off the board
    pub fn offset(&self, dcol: i8, drow: i8) -> Square {
        Square::new(self.col + dcol, self.row + drow)
    }

    /// Zero-based (grid_row, grid_col); grid row 0 holds rank 5
    pub fn to_index(&self) -> Option<(usize, usize)> {
        if !self.is_valid() {
            return None;
        }
        Some(((BOARD_SIZE - self.row) as usize, (self.col - 1) as usize))
    }

    /// Inverse of `to_index`
    pub fn from_index(grid_row: usize, grid_col: usize) -> Square {
        Square::new(grid_col as i8 + 1, BOARD_SIZE - grid_row as i8)
    }

    /// All 25 squares in file-then-rank order
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=BOARD_SIZE).flat_map(|col| (1..=BOARD_SIZE).map(move |row| Square::new(col, row)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", (b'a' + (self.col - 1) as u8) as char, self.row)
        } else {
            write!(f, "({},{})", self.col, self.row)
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// 5x5 grid of optional pieces, indexed by grid (row, col)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Piece at square (None for empty or off-board squares)
    pub fn get(&self, sq: Square) -> Option<Piece> {
        sq.to_index().and_then(|(r, c)| self.cells[r][c])
    }

    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Put a piece on a square, returning what was there
    pub fn place(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let (r, c) = sq.to_index()?;
        self.cells[r][c].replace(piece)
    }

    /// Remove and return the piece on a square
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        let (r, c) = sq.to_index()?;
        self.cells[r][c].take()
    }

    /// Move the piece on `from` to `to`, optionally promoting it.
    /// Returns the captured piece, if any. No rule checks happen here.
    pub fn move_piece(&mut self, from: Square, to: Square, promote: bool) -> Option<Piece> {
        let mut piece = self.take(from)?;
        if promote {
            piece.promoted = true;
        }
        self.place(to, piece)
    }

    /// Iterate occupied squares in file-then-rank order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Iterate one side's pieces
    pub fn side_pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.side == side)
    }

    /// Square of a side's king
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.side_pieces(side)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Whether the side has an unpromoted pawn anywhere in the file
    pub fn has_pawn_in_file(&self, side: Side, col: i8) -> bool {
        (1..=BOARD_SIZE).any(|row| {
            self.get(Square::new(col, row))
                .map_or(false, |p| p.side == side && p.kind == PieceKind::Pawn && !p.promoted)
        })
    }
}
