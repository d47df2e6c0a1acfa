use serde::{Serialize, Serializer};
use std::fmt;

use super::types::{Piece, PieceType, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    DoublePawnPush,
    EnPassant,
    CastleKingSide,
    CastleQueenSide,
    Promotion,
}

/// A generated move. Pure data; the position it was generated from is not
/// referenced, so it is only meaningful against that position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>, kind: MoveKind) -> Self {
        Self { from, to, piece, captured, promotion: None, kind }
    }

    pub fn promotion(from: Square, to: Square, piece: Piece, captured: Option<Piece>, promo: PieceType) -> Self {
        Self { from, to, piece, captured, promotion: Some(promo), kind: MoveKind::Promotion }
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::CastleKingSide | MoveKind::CastleQueenSide)
    }

    /// Square of the captured piece; differs from `to` for en passant.
    pub fn capture_square(&self) -> Square {
        if self.kind == MoveKind::EnPassant {
            Square::from_coords(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }
}

/// Long algebraic (UCI) notation.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion { write!(f, "{}", p.to_char())?; }
        Ok(())
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
