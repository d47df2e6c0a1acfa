use super::movelist::MoveList;
use super::moves::{Move, MoveKind};
use super::position::{Position, BISHOP_DELTAS, KING_DELTAS, KNIGHT_DELTAS, QUEEN_DELTAS, ROOK_DELTAS};
use super::types::{Castling, Color, Piece, PieceType, Square};

/// Which moves to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    /// Every pseudo-legal move, castling included.
    All,
    /// Captures and promotions only.
    Tactical,
}

/// Pseudo-legal move generator owning a reusable move buffer.
///
/// Output order is deterministic: piece type (pawn .. king), then origin
/// square ascending, then delta order; castling moves come last.
#[derive(Clone, Debug, Default)]
pub struct MoveGenerator {
    list: MoveList,
}

impl MoveGenerator {
    pub fn new() -> Self { Self { list: MoveList::new() } }

    pub fn list(&self) -> &MoveList { &self.list }

    /// Fills the buffer with pseudo-legal moves for the side to move.
    pub fn generate(&mut self, pos: &Position, mode: GenMode) -> &mut MoveList {
        self.list.clear();
        let us = pos.side_to_move();
        for kind in PieceType::ALL {
            for from in pos.pieces(us, kind) {
                let piece = Piece::new(us, kind);
                match kind {
                    PieceType::Pawn => self.pawn_moves(pos, piece, from, mode),
                    PieceType::Knight => self.jump_moves(pos, piece, from, &KNIGHT_DELTAS, mode),
                    PieceType::King => self.jump_moves(pos, piece, from, &KING_DELTAS, mode),
                    PieceType::Bishop => self.slide_moves(pos, piece, from, &BISHOP_DELTAS, mode),
                    PieceType::Rook => self.slide_moves(pos, piece, from, &ROOK_DELTAS, mode),
                    PieceType::Queen => self.slide_moves(pos, piece, from, &QUEEN_DELTAS, mode),
                }
            }
        }
        if mode == GenMode::All { self.castling_moves(pos); }
        &mut self.list
    }

    /// Moves for search: evasions (everything) when in check, all moves at
    /// positive depth, tactical moves in quiescence. Rated and sorted.
    pub fn generate_for_search(&mut self, pos: &Position, depth: i32, in_check: bool) -> &mut MoveList {
        let mode = if in_check || depth > 0 { GenMode::All } else { GenMode::Tactical };
        self.generate(pos, mode);
        self.list.rate_mvv_lva();
        self.list.sort();
        &mut self.list
    }

    /// Pseudo-legal moves filtered by king safety.
    pub fn generate_legal(&mut self, pos: &mut Position) -> &mut MoveList {
        self.generate(pos, GenMode::All);
        let us = pos.side_to_move();
        self.list.retain(|e| {
            pos.make_move(e.mv);
            let legal = !pos.is_check_for(us);
            pos.undo_move(e.mv);
            legal
        });
        &mut self.list
    }

    fn add_target(&mut self, pos: &Position, piece: Piece, from: Square, to: Square, mode: GenMode) -> bool {
        match pos.piece_at(to) {
            None => {
                if mode == GenMode::All { self.list.push(Move::new(from, to, piece, None, MoveKind::Quiet)); }
                true
            }
            Some(target) => {
                if target.color != piece.color {
                    self.list.push(Move::new(from, to, piece, Some(target), MoveKind::Capture));
                }
                false
            }
        }
    }

    fn jump_moves(&mut self, pos: &Position, piece: Piece, from: Square, deltas: &[(i8, i8)], mode: GenMode) {
        for &(df, dr) in deltas {
            if let Some(to) = from.offset(df, dr) { self.add_target(pos, piece, from, to, mode); }
        }
    }

    fn slide_moves(&mut self, pos: &Position, piece: Piece, from: Square, deltas: &[(i8, i8)], mode: GenMode) {
        for &(df, dr) in deltas {
            let mut cur = from;
            while let Some(to) = cur.offset(df, dr) {
                if !self.add_target(pos, piece, from, to, mode) { break; }
                cur = to;
            }
        }
    }

    fn push_pawn_move(&mut self, piece: Piece, from: Square, to: Square, captured: Option<Piece>) {
        let last_rank = if piece.color == Color::White { 7 } else { 0 };
        if to.rank() == last_rank {
            for promo in PieceType::PROMOTIONS { self.list.push(Move::promotion(from, to, piece, captured, promo)); }
        } else {
            let kind = if captured.is_some() { MoveKind::Capture } else { MoveKind::Quiet };
            self.list.push(Move::new(from, to, piece, captured, kind));
        }
    }

    fn pawn_moves(&mut self, pos: &Position, piece: Piece, from: Square, mode: GenMode) {
        let fwd = piece.color.forward();
        let start_rank = if piece.color == Color::White { 1 } else { 6 };
        let last_rank = if piece.color == Color::White { 7 } else { 0 };

        // Captures, including en passant
        for df in [-1, 1] {
            let Some(to) = from.offset(df, fwd) else { continue };
            match pos.piece_at(to) {
                Some(target) if target.color != piece.color => self.push_pawn_move(piece, from, to, Some(target)),
                None if pos.en_passant() == Some(to) => {
                    let victim = Piece::new(!piece.color, PieceType::Pawn);
                    self.list.push(Move::new(from, to, piece, Some(victim), MoveKind::EnPassant));
                }
                _ => {}
            }
        }

        // Pushes; in tactical mode only those that promote
        let Some(one) = from.offset(0, fwd) else { return };
        if pos.piece_at(one).is_some() { return; }
        if mode == GenMode::All || one.rank() == last_rank {
            self.push_pawn_move(piece, from, one, None);
        }
        if mode == GenMode::All && from.rank() == start_rank {
            if let Some(two) = one.offset(0, fwd) {
                if pos.piece_at(two).is_none() {
                    self.list.push(Move::new(from, two, piece, None, MoveKind::DoublePawnPush));
                }
            }
        }
    }

    fn castling_moves(&mut self, pos: &Position) {
        let us = pos.side_to_move();
        let them = !us;
        let king = Piece::new(us, PieceType::King);
        for (side, kind) in [
            (Castling::king_side(us), MoveKind::CastleKingSide),
            (Castling::queen_side(us), MoveKind::CastleQueenSide),
        ] {
            if !pos.castling_rights().has(side) { continue; }
            let (king_from, king_to, rook_from, _) = side.squares();
            if pos.piece_at(king_from) != Some(king) { continue; }
            // Every square strictly between king and rook must be empty
            let (lo, hi) = if rook_from < king_from { (rook_from, king_from) } else { (king_from, rook_from) };
            let blocked = (lo.index() + 1..hi.index()).any(|i| pos.piece_at(Square::new(i as u8)).is_some());
            if blocked { continue; }
            // King may not castle out of or through check; the destination is
            // left to the legality filter.
            let transit = if king_to > king_from { king_from.offset(1, 0) } else { king_from.offset(-1, 0) };
            let Some(transit) = transit else { continue };
            if pos.is_attacked(king_from, them) || pos.is_attacked(transit, them) { continue; }
            self.list.push(Move::new(king_from, king_to, king, None, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves_in_order() {
        let pos = Position::startpos();
        let mut gen = MoveGenerator::new();
        let moves: Vec<String> = gen.generate(&pos, GenMode::All).moves().map(|m| m.to_string()).collect();
        assert_eq!(moves.len(), 20);
        assert_eq!(&moves[..3], &["a2a3", "a2a4", "b2b3"]);
        assert_eq!(&moves[16..], &["b1c3", "b1a3", "g1h3", "g1f3"]);
    }

    #[test]
    fn tactical_mode_only_captures_and_promotions() {
        let pos = Position::from_fen("4k3/1P6/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mut gen = MoveGenerator::new();
        let moves: Vec<String> = gen.generate(&pos, GenMode::Tactical).moves().map(|m| m.to_string()).collect();
        assert_eq!(moves, vec!["e4d5", "b7b8q", "b7b8r", "b7b8b", "b7b8n"]);
    }

    #[test]
    fn castling_blocked_through_attack() {
        // Black rook on f8 covers f1: only queen-side castling is available.
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let mut gen = MoveGenerator::new();
        let castles: Vec<String> = gen
            .generate(&pos, GenMode::All)
            .moves()
            .filter(|m| m.is_castle())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(castles, vec!["e1c1"]);
    }
}
