//! Piece definitions and movement tables

use serde::{Deserialize, Serialize};

/// The two players. Lower starts on rank 5 and moves toward rank 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Lower = 0,
    Upper = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }

    /// Rank delta of one step forward
    pub fn forward(self) -> i8 {
        match self {
            Side::Lower => -1,
            Side::Upper => 1,
        }
    }

    /// Back rank of the opponent: the promotion rank and the pawn's last rank
    pub fn promotion_row(self) -> i8 {
        match self {
            Side::Lower => 1,
            Side::Upper => 5,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Base piece kind; promotion is carried separately on `Piece`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Pawn,
    ];

    /// King and Gold never promote
    pub fn can_promote(self) -> bool {
        !matches!(self, PieceKind::King | PieceKind::Gold)
    }

    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop)
    }

    /// Lowercase letter used in text output
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Gold => 'g',
            PieceKind::Silver => 's',
            PieceKind::Pawn => 'p',
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    #[serde(default)]
    pub promoted: bool,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, promoted: false, side }
    }

    pub const fn new_promoted(kind: PieceKind, side: Side) -> Self {
        Self { kind, promoted: true, side }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Promoted King or Gold does not exist
    pub fn is_well_formed(&self) -> bool {
        !self.promoted || self.kind.can_promote()
    }

    /// What a capture of this piece puts in the capturer's hand
    pub fn demoted(&self) -> PieceKind {
        self.kind
    }

    pub fn movement(&self) -> Movement {
        movement_for(self.kind, self.promoted)
    }
}

// ============================================================================
// MOVEMENT TABLES
// ============================================================================

/// Direction bitmasks relative to the side's forward direction
pub const DIR_F: u8 = 1 << 0;   // Forward
pub const DIR_FR: u8 = 1 << 1;  // Forward-Right
pub const DIR_R: u8 = 1 << 2;   // Right
pub const DIR_BR: u8 = 1 << 3;  // Back-Right
pub const DIR_B: u8 = 1 << 4;   // Backward
pub const DIR_BL: u8 = 1 << 5;  // Back-Left
pub const DIR_L: u8 = 1 << 6;   // Left
pub const DIR_FL: u8 = 1 << 7;  // Forward-Left

pub const ALL_DIRS: u8 = 0xFF;
pub const ORTHOGONAL_DIRS: u8 = DIR_F | DIR_R | DIR_B | DIR_L;
pub const DIAGONAL_DIRS: u8 = DIR_FR | DIR_BR | DIR_BL | DIR_FL;
pub const GOLD_DIRS: u8 = ALL_DIRS & !(DIR_BL | DIR_BR);
pub const SILVER_DIRS: u8 = DIR_F | DIR_FL | DIR_FR | DIR_BL | DIR_BR;

/// Relative (dcol, forward) vectors, indexed by bit position
const RELATIVE_VECTORS: [(i8, i8); 8] = [
    (0, 1),   // F
    (1, 1),   // FR
    (1, 0),   // R
    (1, -1),  // BR
    (0, -1),  // B
    (-1, -1), // BL
    (-1, 0),  // L
    (-1, 1),  // FL
];

/// One-square steps plus unbounded slides, both as direction masks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Movement {
    pub steps: u8,
    pub slides: u8,
}

pub fn movement_for(kind: PieceKind, promoted: bool) -> Movement {
    let (steps, slides) = match (kind, promoted) {
        (PieceKind::King, _) => (ALL_DIRS, 0),
        (PieceKind::Rook, false) => (0, ORTHOGONAL_DIRS),
        (PieceKind::Rook, true) => (ALL_DIRS, ORTHOGONAL_DIRS),
        (PieceKind::Bishop, false) => (0, DIAGONAL_DIRS),
        (PieceKind::Bishop, true) => (ALL_DIRS, DIAGONAL_DIRS),
        (PieceKind::Gold, _) => (GOLD_DIRS, 0),
        (PieceKind::Silver, false) => (SILVER_DIRS, 0),
        (PieceKind::Pawn, false) => (DIR_F, 0),
        (PieceKind::Silver, true) | (PieceKind::Pawn, true) => (GOLD_DIRS, 0),
    };
    Movement { steps, slides }
}

/// Absolute (dcol, drow) for each direction bit set in `mask`
pub fn direction_vectors(side: Side, mask: u8) -> impl Iterator<Item = (i8, i8)> {
    let forward = side.forward();
    (0..8usize)
        .filter(move |&bit| mask & (1u8 << bit) != 0)
        .map(move |bit| {
            let (dcol, dfwd) = RELATIVE_VECTORS[bit];
            (dcol, dfwd * forward)
        })
}
