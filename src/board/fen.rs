use super::position::Position;
use super::types::{Castling, Color, Piece, PieceType, Square};
use crate::error::ParseError;

impl Position {
    /// Parses Forsyth-Edwards Notation. The two clock fields may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, fields[0])?;

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ParseError::SideToMove(other.to_string())),
        };
        pos.set_side_to_move(side);

        if fields[2] != "-" {
            for ch in fields[2].chars() {
                let c = Castling::ALL
                    .into_iter()
                    .find(|c| c.to_char() == ch)
                    .ok_or(ParseError::Castling(ch))?;
                // Rights whose king or rook is missing are dropped.
                let (king, _, rook, _) = c.squares();
                let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
                if pos.piece_at(king) == Some(Piece::new(color, PieceType::King))
                    && pos.piece_at(rook) == Some(Piece::new(color, PieceType::Rook))
                {
                    pos.set_castling(c);
                }
            }
        }

        if fields[3] != "-" {
            let sq = Square::parse(fields[3]).ok_or_else(|| ParseError::EnPassant(fields[3].to_string()))?;
            let expected_rank = if side == Color::White { 5 } else { 2 };
            // The pawn that just double-pushed stands in front of the target
            let pushed = Square::from_coords(sq.file(), if side == Color::White { 4 } else { 3 });
            if sq.rank() != expected_rank
                || pos.piece_at(sq).is_some()
                || pos.piece_at(pushed) != Some(Piece::new(!side, PieceType::Pawn))
            {
                return Err(ParseError::EnPassant(fields[3].to_string()));
            }
            pos.set_en_passant(Some(sq));
        }

        if let Some(text) = fields.get(4) {
            pos.halfmove_clock = text.parse().map_err(|_| ParseError::Clock(text.to_string()))?;
        }
        let (fullmove, text): (u32, &str) = match fields.get(5) {
            Some(text) => (text.parse().map_err(|_| ParseError::Clock(text.to_string()))?, text),
            None => (1, "1"),
        };
        pos.set_fullmove_number(fullmove.max(1)).ok_or_else(|| ParseError::Clock(text.to_string()))?;

        for color in Color::ALL {
            if pos.pieces(color, PieceType::King).count() != 1 {
                return Err(ParseError::KingCount(color));
            }
        }
        if pos.is_check_for(!side) {
            return Err(ParseError::InconsistentSideToMove);
        }
        debug_assert_eq!(pos.hash(), pos.compute_hash());
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(p) => {
                        if empty > 0 { out.push(char::from(b'0' + empty)); empty = 0; }
                        out.push(p.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 { out.push(char::from(b'0' + empty)); }
            if rank > 0 { out.push('/'); }
        }
        out.push(' ');
        out.push(if self.side_to_move() == Color::White { 'w' } else { 'b' });
        out.push(' ');
        let rights = self.castling_rights();
        if rights.is_empty() {
            out.push('-');
        } else {
            out.extend(rights.iter().map(Castling::to_char));
        }
        out.push(' ');
        match self.en_passant() {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock(), self.fullmove_number()));
        out
    }
}

fn parse_placement(pos: &mut Position, field: &str) -> Result<(), ParseError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::Placement(field.to_string()));
    }
    for (i, row) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) { return Err(ParseError::Placement(field.to_string())); }
                file += skip as u8;
            } else {
                let piece = Piece::from_char(ch).ok_or(ParseError::Piece(ch))?;
                if file >= 8 { return Err(ParseError::Placement(field.to_string())); }
                if piece.kind == PieceType::Pawn && (rank == 0 || rank == 7) {
                    return Err(ParseError::Placement(field.to_string()));
                }
                pos.put(piece, Square::from_coords(file, rank));
                file += 1;
            }
            if file > 8 { return Err(ParseError::Placement(field.to_string())); }
        }
        if file != 8 { return Err(ParseError::Placement(field.to_string())); }
    }
    Ok(())
}
