use std::fmt;

use super::bitboard::Bitboard;
use super::movegen::MoveGenerator;
use super::moves::{Move, MoveKind};
use super::types::{Castling, CastlingRights, Color, Piece, PieceType, Square, MAX_PLY};
use super::zobrist;
use crate::error::ParseError;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Capacity of the undo stack: a full search on top of a long reversible run.
pub const MAX_HISTORY: usize = MAX_PLY + 1024;

pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
pub(crate) const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub(crate) const ROOK_DELTAS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub(crate) const QUEEN_DELTAS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
pub(crate) const KING_DELTAS: [(i8, i8); 8] = QUEEN_DELTAS;

/// Irreversible state saved by `make_move` and restored by `undo_move`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct State {
    hash: u64,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

/// Mutable chess position with incremental hashing and a bounded undo stack.
#[derive(Clone, Debug)]
pub struct Position {
    pub(super) board: [Option<Piece>; 64],
    pub(super) pieces: [[Bitboard; 6]; 2],
    pub(super) occupied: [Bitboard; 2],
    pub(super) material: [i32; 2],
    pub(super) side_to_move: Color,
    pub(super) castling: CastlingRights,
    pub(super) en_passant: Option<Square>,
    pub(super) halfmove_clock: u32,
    pub(super) halfmove_number: u32,
    pub(super) hash: u64,
    history: Box<[State]>,
    history_len: usize,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.pieces == other.pieces
            && self.occupied == other.occupied
            && self.material == other.material
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.halfmove_number == other.halfmove_number
            && self.hash == other.hash
            && self.history[..self.history_len] == other.history[..other.history_len]
    }
}

impl Eq for Position {}

impl Position {
    pub(super) fn empty() -> Self {
        Self {
            board: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            material: [0; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            halfmove_number: 2,
            hash: 0,
            history: vec![State::default(); MAX_HISTORY].into_boxed_slice(),
            history_len: 0,
        }
    }

    /// The standard initial setup.
    pub fn startpos() -> Self {
        let mut pos = Self::empty();
        let back = [
            PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
            PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
        ];
        for (file, &kind) in back.iter().enumerate() {
            let f = file as u8;
            pos.put(Piece::new(Color::White, kind), Square::from_coords(f, 0));
            pos.put(Piece::new(Color::White, PieceType::Pawn), Square::from_coords(f, 1));
            pos.put(Piece::new(Color::Black, PieceType::Pawn), Square::from_coords(f, 6));
            pos.put(Piece::new(Color::Black, kind), Square::from_coords(f, 7));
        }
        for c in Castling::ALL { pos.set_castling(c); }
        pos
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> { self.board[sq.index()] }
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceType) -> Bitboard { self.pieces[color.index()][kind.index()] }
    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard { self.occupied[color.index()] }
    #[inline]
    pub fn occupied(&self) -> Bitboard { self.occupied[0] | self.occupied[1] }
    #[inline]
    pub fn material(&self, color: Color) -> i32 { self.material[color.index()] }
    #[inline]
    pub fn side_to_move(&self) -> Color { self.side_to_move }
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights { self.castling }
    #[inline]
    pub fn en_passant(&self) -> Option<Square> { self.en_passant }
    #[inline]
    pub fn halfmove_clock(&self) -> u32 { self.halfmove_clock }
    #[inline]
    pub fn fullmove_number(&self) -> u32 { self.halfmove_number / 2 }
    #[inline]
    pub fn hash(&self) -> u64 { self.hash }
    /// Number of outstanding `make_move` calls.
    #[inline]
    pub fn history_len(&self) -> usize { self.history_len }

    pub fn king_square(&self, color: Color) -> Option<Square> { self.pieces(color, PieceType::King).lsb() }

    /// `None` when the move number does not fit the halfmove counter.
    pub(super) fn set_fullmove_number(&mut self, fullmove: u32) -> Option<()> {
        let black = if self.side_to_move == Color::Black { 1 } else { 0 };
        self.halfmove_number = fullmove.checked_mul(2)?.checked_add(black)?;
        Some(())
    }

    pub(super) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.side_to_move = color;
            self.hash ^= zobrist::side();
        }
    }

    pub(super) fn set_castling(&mut self, c: Castling) {
        if !self.castling.has(c) {
            self.castling.set(c);
            self.hash ^= zobrist::castling(c);
        }
    }

    pub(super) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant { self.hash ^= zobrist::en_passant(old); }
        self.en_passant = sq;
        if let Some(new) = sq { self.hash ^= zobrist::en_passant(new); }
    }

    pub(super) fn put(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none(), "put onto occupied {sq}");
        self.board[sq.index()] = Some(piece);
        self.pieces[piece.color.index()][piece.kind.index()].set(sq);
        self.occupied[piece.color.index()].set(sq);
        self.material[piece.color.index()] += piece.kind.value();
        self.hash ^= zobrist::piece(piece, sq);
    }

    fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take()?;
        self.pieces[piece.color.index()][piece.kind.index()].clear(sq);
        self.occupied[piece.color.index()].clear(sq);
        self.material[piece.color.index()] -= piece.kind.value();
        self.hash ^= zobrist::piece(piece, sq);
        Some(piece)
    }

    fn clear_castling(&mut self, sq: Square) {
        let touched = CastlingRights::touched_by(sq);
        for c in self.castling.iter() {
            if touched.has(c) { self.hash ^= zobrist::castling(c); }
        }
        self.castling.remove(touched);
    }

    fn castle_side(mv: &Move) -> Option<Castling> {
        match mv.kind {
            MoveKind::CastleKingSide => Some(Castling::king_side(mv.piece.color)),
            MoveKind::CastleQueenSide => Some(Castling::queen_side(mv.piece.color)),
            _ => None,
        }
    }

    /// Applies a pseudo-legal move. No legality check; the mover's king may be
    /// left attacked and the caller is expected to test `is_check_for`.
    pub fn make_move(&mut self, mv: Move) {
        assert!(self.history_len < self.history.len(), "position history overflow");
        self.history[self.history_len] = State {
            hash: self.hash,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        };
        self.history_len += 1;

        let us = mv.piece.color;
        if mv.captured.is_some() {
            let sq = mv.capture_square();
            self.remove(sq);
            self.clear_castling(sq);
        }

        self.remove(mv.from);
        let placed = match mv.promotion {
            Some(kind) => Piece::new(us, kind),
            None => mv.piece,
        };
        self.put(placed, mv.to);

        if let Some(side) = Self::castle_side(&mv) {
            let (_, _, rook_from, rook_to) = side.squares();
            if let Some(rook) = self.remove(rook_from) { self.put(rook, rook_to); }
        }

        self.clear_castling(mv.from);

        let ep = if mv.kind == MoveKind::DoublePawnPush {
            Some(Square::from_coords(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2))
        } else {
            None
        };
        self.set_en_passant(ep);

        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::side();

        if mv.piece.kind == PieceType::Pawn || mv.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.halfmove_number += 1;
    }

    /// Exact inverse of the matching `make_move`; calls must be LIFO.
    pub fn undo_move(&mut self, mv: Move) {
        assert!(self.history_len > 0, "undo_move without a matching make_move");
        self.history_len -= 1;
        let state = self.history[self.history_len];

        self.halfmove_number -= 1;
        self.side_to_move = !self.side_to_move;

        if let Some(side) = Self::castle_side(&mv) {
            let (_, _, rook_from, rook_to) = side.squares();
            if let Some(rook) = self.remove(rook_to) { self.put(rook, rook_from); }
        }

        self.remove(mv.to);
        self.put(mv.piece, mv.from);
        if let Some(captured) = mv.captured { self.put(captured, mv.capture_square()); }

        self.hash = state.hash;
        self.castling = state.castling;
        self.en_passant = state.en_passant;
        self.halfmove_clock = state.halfmove_clock;
    }

    /// Drops the undo stack. Only valid when nothing will be undone, e.g. after
    /// an irreversible game move has been played.
    pub fn clear_history(&mut self) { self.history_len = 0; }

    /// Hash recomputed from every term.
    pub fn compute_hash(&self) -> u64 {
        let mut key = 0u64;
        for sq in Square::iter() {
            if let Some(p) = self.piece_at(sq) { key ^= zobrist::piece(p, sq); }
        }
        for c in self.castling.iter() { key ^= zobrist::castling(c); }
        if let Some(ep) = self.en_passant { key ^= zobrist::en_passant(ep); }
        if self.side_to_move == Color::Black { key ^= zobrist::side(); }
        key
    }

    /// True if any `attacker` piece pseudo-attacks `target`.
    pub fn is_attacked(&self, target: Square, attacker: Color) -> bool {
        let pawns = self.pieces(attacker, PieceType::Pawn);
        let back = -attacker.forward();
        for df in [-1, 1] {
            if let Some(sq) = target.offset(df, back) {
                if pawns.contains(sq) { return true; }
            }
        }
        if self.jump_attack(target, self.pieces(attacker, PieceType::Knight), &KNIGHT_DELTAS) { return true; }
        if self.jump_attack(target, self.pieces(attacker, PieceType::King), &KING_DELTAS) { return true; }
        let queens = self.pieces(attacker, PieceType::Queen);
        if self.ray_attack(target, self.pieces(attacker, PieceType::Bishop) | queens, &BISHOP_DELTAS) { return true; }
        self.ray_attack(target, self.pieces(attacker, PieceType::Rook) | queens, &ROOK_DELTAS)
    }

    fn jump_attack(&self, target: Square, attackers: Bitboard, deltas: &[(i8, i8)]) -> bool {
        if attackers.is_empty() { return false; }
        deltas.iter().any(|&(df, dr)| target.offset(df, dr).map_or(false, |sq| attackers.contains(sq)))
    }

    fn ray_attack(&self, target: Square, attackers: Bitboard, deltas: &[(i8, i8)]) -> bool {
        if attackers.is_empty() { return false; }
        let occupied = self.occupied();
        for &(df, dr) in deltas {
            let mut cur = target;
            while let Some(sq) = cur.offset(df, dr) {
                if occupied.contains(sq) {
                    if attackers.contains(sq) { return true; }
                    break;
                }
                cur = sq;
            }
        }
        false
    }

    /// Is the side to move in check?
    pub fn is_check(&self) -> bool { self.is_check_for(self.side_to_move) }

    pub fn is_check_for(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(k) => self.is_attacked(k, !color),
            None => false,
        }
    }

    /// Current position already occurred with the same side to move since the
    /// last capture or pawn move.
    pub fn is_repetition(&self) -> bool {
        let floor = self.history_len.saturating_sub(self.halfmove_clock as usize);
        let mut i = self.history_len;
        while i >= floor + 2 {
            i -= 2;
            if self.history[i].hash == self.hash { return true; }
        }
        false
    }

    /// Dead positions by material alone: bare kings, a single minor piece, or
    /// one bishop each on the same square color.
    pub fn has_insufficient_material(&self) -> bool {
        for c in Color::ALL {
            let heavy = self.pieces(c, PieceType::Pawn) | self.pieces(c, PieceType::Rook) | self.pieces(c, PieceType::Queen);
            if !heavy.is_empty() { return false; }
        }
        let knights = self.pieces(Color::White, PieceType::Knight).count() + self.pieces(Color::Black, PieceType::Knight).count();
        let wb = self.pieces(Color::White, PieceType::Bishop);
        let bb = self.pieces(Color::Black, PieceType::Bishop);
        match knights + wb.count() + bb.count() {
            0 | 1 => true,
            2 if knights == 0 && wb.count() == 1 && bb.count() == 1 => {
                match (wb.lsb(), bb.lsb()) {
                    (Some(a), Some(b)) => (a.file() + a.rank()) % 2 == (b.file() + b.rank()) % 2,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    pub fn is_fifty_move_draw(&self) -> bool { self.halfmove_clock >= 100 }

    /// Strictly legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mut gen = MoveGenerator::new();
        gen.generate_legal(self).moves().collect()
    }

    /// Resolves a long algebraic move (`e2e4`, `a7a8q`) against the legal moves.
    pub fn parse_uci_move(&mut self, text: &str) -> Result<Move, ParseError> {
        self.legal_moves()
            .into_iter()
            .find(|m| m.to_string() == text)
            .ok_or_else(|| ParseError::IllegalMove(text.to_string()))
    }

    /// Plays a sequence of protocol moves as game moves. History before each
    /// irreversible move is dropped so long games never exhaust the stack.
    pub fn apply_uci_moves<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<(), ParseError> {
        for text in moves {
            let mv = self.parse_uci_move(text.as_ref())?;
            self.make_move(mv);
            if self.halfmove_clock == 0 { self.clear_history(); }
        }
        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_fen()) }
}
