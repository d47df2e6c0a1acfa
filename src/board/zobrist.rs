// Zobrist keys: one per (piece, square), castling right, en-passant file and side to move.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

use super::types::{Castling, Piece, Square};

const SEED: u64 = 0xF00D_F00D_DEAD_BEEF;

struct Keys {
    pieces: [[u64; 64]; 12],
    castling: [u64; 4],
    en_passant: [u64; 8],
    side: u64,
}

static KEYS: OnceLock<Keys> = OnceLock::new();

fn keys() -> &'static Keys {
    KEYS.get_or_init(|| {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut k = Keys { pieces: [[0; 64]; 12], castling: [0; 4], en_passant: [0; 8], side: 0 };
        for row in k.pieces.iter_mut() {
            for v in row.iter_mut() { *v = rng.gen(); }
        }
        for v in k.castling.iter_mut() { *v = rng.gen(); }
        for v in k.en_passant.iter_mut() { *v = rng.gen(); }
        k.side = rng.gen();
        k
    })
}

#[inline]
pub fn piece(p: Piece, sq: Square) -> u64 { keys().pieces[p.index()][sq.index()] }

#[inline]
pub fn castling(c: Castling) -> u64 { keys().castling[c.index()] }

#[inline]
pub fn en_passant(sq: Square) -> u64 { keys().en_passant[sq.file() as usize] }

#[inline]
pub fn side() -> u64 { keys().side }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{Color, PieceType};
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        let mut seen = HashSet::new();
        for c in Color::ALL {
            for t in PieceType::ALL {
                for sq in Square::iter() { assert!(seen.insert(piece(Piece::new(c, t), sq))); }
            }
        }
        for c in Castling::ALL { assert!(seen.insert(castling(c))); }
        for f in 0..8 { assert!(seen.insert(en_passant(Square::from_coords(f, 2)))); }
        assert!(seen.insert(side()));
    }
}
