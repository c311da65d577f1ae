//! Captured pieces available for dropping

use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, PieceKind};

/// Multiset of captured, unpromoted piece kinds owned by one side.
/// Insertion order is kept so listings are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureHand {
    pieces: Vec<PieceKind>,
}

impl CaptureHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        Self {
            pieces: kinds.into_iter().collect(),
        }
    }

    /// Record a captured piece; it enters the hand demoted
    pub fn capture(&mut self, piece: Piece) {
        self.add(piece.demoted());
    }

    pub fn add(&mut self, kind: PieceKind) {
        self.pieces.push(kind);
    }

    /// Remove one instance of `kind`; false if none was held
    pub fn remove(&mut self, kind: PieceKind) -> bool {
        match self.pieces.iter().position(|&k| k == kind) {
            Some(idx) => {
                self.pieces.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, kind: PieceKind) -> bool {
        self.pieces.contains(&kind)
    }

    pub fn count(&self, kind: PieceKind) -> usize {
        self.pieces.iter().filter(|&&k| k == kind).count()
    }

    /// Distinct kinds held, in `PieceKind` order
    pub fn kinds(&self) -> Vec<PieceKind> {
        let mut kinds = self.pieces.clone();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Side;

    #[test]
    fn test_capture_demotes() {
        let mut hand = CaptureHand::new();
        hand.capture(Piece::new_promoted(PieceKind::Rook, Side::Upper));
        assert!(hand.contains(PieceKind::Rook));
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn test_multiset_semantics() {
        let mut hand = CaptureHand::from_kinds([PieceKind::Pawn, PieceKind::Gold, PieceKind::Pawn]);
        assert_eq!(hand.count(PieceKind::Pawn), 2);
        assert_eq!(hand.kinds(), vec![PieceKind::Gold, PieceKind::Pawn]);

        assert!(hand.remove(PieceKind::Pawn));
        assert_eq!(hand.count(PieceKind::Pawn), 1);
        assert!(!hand.remove(PieceKind::Silver));
        assert_eq!(hand.iter().collect::<Vec<_>>(), vec![PieceKind::Gold, PieceKind::Pawn]);
    }
}
