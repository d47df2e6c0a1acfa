use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use super::types::Square;

/// A set of squares, bit `i` = square `i` (a1 = 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub fn from_square(sq: Square) -> Bitboard { Bitboard(1u64 << sq.index()) }

    #[inline]
    pub fn set(&mut self, sq: Square) { self.0 |= 1u64 << sq.index(); }
    #[inline]
    pub fn clear(&mut self, sq: Square) { self.0 &= !(1u64 << sq.index()); }
    #[inline]
    pub fn contains(self, sq: Square) -> bool { self.0 & (1u64 << sq.index()) != 0 }
    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }
    #[inline]
    pub fn count(self) -> u32 { self.0.count_ones() }

    /// Least significant set square, if any.
    #[inline]
    pub fn lsb(self) -> Option<Square> {
        if self.0 == 0 { None } else { Some(Square::new(self.0.trailing_zeros() as u8)) }
    }

    /// Removes and returns the least significant set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }
}

impl Iterator for Bitboard {
    type Item = Square;
    #[inline]
    fn next(&mut self) -> Option<Square> { self.pop_lsb() }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard { Bitboard(self.0 | rhs.0) }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) { self.0 |= rhs.0; }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard { Bitboard(self.0 & rhs.0) }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard { Bitboard(!self.0) }
}
