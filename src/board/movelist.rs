use super::moves::Move;
use super::types::{PieceType, MAX_PLY};

/// Upper bound on pseudo-legal moves in any chess position.
pub const MAX_MOVES: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Candidate moves with attached scores. Generation order until `sort`.
///
/// The buffer is allocated once with room for `MAX_MOVES` and reused.
#[derive(Clone, Debug)]
pub struct MoveList {
    entries: Vec<ScoredMove>,
}

impl Default for MoveList {
    fn default() -> Self { Self::new() }
}

impl MoveList {
    pub fn new() -> Self { Self { entries: Vec::with_capacity(MAX_MOVES) } }

    #[inline]
    pub fn clear(&mut self) { self.entries.clear(); }

    #[inline]
    pub fn push(&mut self, mv: Move) { self.entries.push(ScoredMove { mv, score: 0 }); }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[inline]
    pub fn get(&self, i: usize) -> Move { self.entries[i].mv }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredMove> { self.entries.iter() }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ { self.entries.iter().map(|e| e.mv) }

    pub fn retain(&mut self, f: impl FnMut(&ScoredMove) -> bool) { self.entries.retain(f); }

    /// Stable sort by score, best first.
    pub fn sort(&mut self) { self.entries.sort_by(|a, b| b.score.cmp(&a.score)); }

    /// Most valuable victim first, then least valuable attacker.
    pub fn rate_mvv_lva(&mut self) {
        for e in self.entries.iter_mut() {
            let mut score = PieceType::King.value() / e.mv.piece.kind.value();
            if let Some(victim) = e.mv.captured { score += 10 * victim.kind.value(); }
            if let Some(promo) = e.mv.promotion { score += promo.value(); }
            e.score = score;
        }
    }
}

/// A line of moves from some ply onward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveVariation {
    moves: Vec<Move>,
}

impl MoveVariation {
    pub fn new() -> Self { Self { moves: Vec::with_capacity(MAX_PLY) } }

    #[inline]
    pub fn clear(&mut self) { self.moves.clear(); }

    #[inline]
    pub fn len(&self) -> usize { self.moves.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.moves.is_empty() }

    pub fn moves(&self) -> &[Move] { &self.moves }

    /// `self = [mv] ++ tail`
    pub fn set(&mut self, mv: Move, tail: &MoveVariation) {
        self.moves.clear();
        self.moves.push(mv);
        let room = MAX_PLY.saturating_sub(1);
        self.moves.extend(tail.moves.iter().take(room).copied());
    }
}

/// One `MoveVariation` per ply. Lines are copied upward, never shared.
#[derive(Clone, Debug)]
pub struct PvTable {
    lines: Vec<MoveVariation>,
}

impl Default for PvTable {
    fn default() -> Self { Self::new() }
}

impl PvTable {
    pub fn new() -> Self { Self { lines: (0..=MAX_PLY).map(|_| MoveVariation::new()).collect() } }

    #[inline]
    pub fn clear(&mut self, ply: usize) { self.lines[ply].clear(); }

    pub fn line(&self, ply: usize) -> &MoveVariation { &self.lines[ply] }

    /// `dest = [mv] ++ source`. Requires `source_ply != dest_ply`.
    pub fn copy_pv(&mut self, source_ply: usize, dest_ply: usize, mv: Move) {
        assert_ne!(source_ply, dest_ply, "pv copy onto itself");
        if source_ply > dest_ply {
            let (lo, hi) = self.lines.split_at_mut(source_ply);
            lo[dest_ply].set(mv, &hi[0]);
        } else {
            let (lo, hi) = self.lines.split_at_mut(dest_ply);
            hi[0].set(mv, &lo[source_ply]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::moves::MoveKind;
    use crate::board::types::{Color, Piece, Square};

    fn quiet(from: &str, to: &str, kind: PieceType) -> Move {
        Move::new(
            Square::parse(from).unwrap(),
            Square::parse(to).unwrap(),
            Piece::new(Color::White, kind),
            None,
            MoveKind::Quiet,
        )
    }

    #[test]
    fn sort_is_stable_and_descending() {
        let mut list = MoveList::new();
        let a = quiet("a2", "a3", PieceType::Pawn);
        let b = quiet("b2", "b3", PieceType::Pawn);
        let mut c = quiet("c2", "c3", PieceType::Pawn);
        c.captured = Some(Piece::new(Color::Black, PieceType::Knight));
        list.push(a);
        list.push(b);
        list.push(c);
        list.rate_mvv_lva();
        list.sort();
        let order: Vec<Move> = list.moves().collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn copy_pv_prefixes_parent_line() {
        let mut pv = PvTable::new();
        let m1 = quiet("e2", "e4", PieceType::Pawn);
        let m2 = quiet("g1", "f3", PieceType::Knight);
        let m3 = quiet("f1", "c4", PieceType::Bishop);
        pv.copy_pv(3, 2, m3);
        pv.copy_pv(2, 1, m2);
        pv.copy_pv(1, 0, m1);
        assert_eq!(pv.line(0).moves(), &[m1, m2, m3]);
        pv.clear(2);
        pv.copy_pv(2, 1, m2);
        assert_eq!(pv.line(1).moves(), &[m2]);
        assert_eq!(pv.line(0).len(), 3, "parent lines are copies, not views");
    }
}
