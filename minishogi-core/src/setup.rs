//! Setup - starting positions and hands

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::Square;
use crate::pieces::{Piece, PieceKind, Side};

/// One piece on one square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece: Piece,
    pub square: Square,
}

impl Placement {
    pub fn new(kind: PieceKind, side: Side, square: Square) -> Self {
        Self {
            piece: Piece::new(kind, side),
            square,
        }
    }
}

/// Starting position plus optional starting hands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub name: String,
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub lower_captures: Vec<PieceKind>,
    #[serde(default)]
    pub upper_captures: Vec<PieceKind>,
}

impl Setup {
    /// No pieces, empty hands
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            placements: Vec::new(),
            lower_captures: Vec::new(),
            upper_captures: Vec::new(),
        }
    }

    /// The standard opening position
    pub fn standard() -> Self {
        use PieceKind::*;

        let back_rank = [King, Gold, Silver, Bishop, Rook];
        let mut placements = Vec::with_capacity(12);

        for (i, &kind) in back_rank.iter().enumerate() {
            placements.push(Placement::new(kind, Side::Lower, Square::new(i as i8 + 1, 5)));
        }
        placements.push(Placement::new(Pawn, Side::Lower, Square::new(1, 4)));

        for (i, &kind) in back_rank.iter().enumerate() {
            placements.push(Placement::new(kind, Side::Upper, Square::new(i as i8 + 1, 1)));
        }
        placements.push(Placement::new(Pawn, Side::Upper, Square::new(2, 2)));

        Self {
            name: "standard".to_string(),
            placements,
            lower_captures: Vec::new(),
            upper_captures: Vec::new(),
        }
    }

    /// Starting hand for a side
    pub fn captures(&self, side: Side) -> &[PieceKind] {
        match side {
            Side::Lower => &self.lower_captures,
            Side::Upper => &self.upper_captures,
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read setup {}", path.display()))?;
        let setup = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse setup {}", path.display()))?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}
