use std::fmt;
use std::ops::Not;

pub const MAX_PLY: usize = 256;
pub const MAX_DEPTH: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Rank delta of a pawn push for this color.
    #[inline]
    pub fn forward(self) -> i8 { if self == Color::White { 1 } else { -1 } }
}

impl Not for Color {
    type Output = Color;
    #[inline]
    fn not(self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn, PieceType::Knight, PieceType::Bishop,
        PieceType::Rook, PieceType::Queen, PieceType::King,
    ];
    pub const PROMOTIONS: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Centipawn value used for material and MVV/LVA.
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 325,
            PieceType::Bishop => 325,
            PieceType::Rook => 500,
            PieceType::Queen => 975,
            PieceType::King => 20_000,
        }
    }

    pub fn is_slider(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
    }

    pub fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceType) -> Self { Self { color, kind } }

    /// Dense index 0..12, white pieces first.
    #[inline]
    pub fn index(self) -> usize { self.color.index() * 6 + self.kind.index() }

    /// FEN letter: uppercase for white.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        if self.color == Color::White { c.to_ascii_uppercase() } else { c }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(color, kind))
    }
}

/// Board square, a1 = 0 .. h8 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    #[inline]
    pub fn new(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    #[inline]
    pub fn from_coords(file: u8, rank: u8) -> Square { Square(rank * 8 + file) }

    #[inline]
    pub fn index(self) -> usize { self.0 as usize }
    #[inline]
    pub fn file(self) -> u8 { self.0 % 8 }
    #[inline]
    pub fn rank(self) -> u8 { self.0 / 8 }

    /// Step by a (file, rank) delta; `None` when the step leaves the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) { Some(Square::from_coords(f as u8, r as u8)) } else { None }
    }

    pub fn iter() -> impl Iterator<Item = Square> { (0..64u8).map(Square) }

    pub fn parse(s: &str) -> Option<Square> {
        let b = s.as_bytes();
        if b.len() != 2 { return None; }
        let (f, r) = (b[0], b[1]);
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) { return None; }
        Some(Square::from_coords(f - b'a', r - b'1'))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

/// One of the four castling rights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Castling {
    WhiteKingSide,
    WhiteQueenSide,
    BlackKingSide,
    BlackQueenSide,
}

impl Castling {
    pub const ALL: [Castling; 4] = [
        Castling::WhiteKingSide, Castling::WhiteQueenSide,
        Castling::BlackKingSide, Castling::BlackQueenSide,
    ];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    #[inline]
    pub fn bit(self) -> u8 { 1 << self as u8 }

    pub fn king_side(color: Color) -> Castling {
        if color == Color::White { Castling::WhiteKingSide } else { Castling::BlackKingSide }
    }

    pub fn queen_side(color: Color) -> Castling {
        if color == Color::White { Castling::WhiteQueenSide } else { Castling::BlackQueenSide }
    }

    /// (king from, king to, rook from, rook to)
    pub fn squares(self) -> (Square, Square, Square, Square) {
        match self {
            Castling::WhiteKingSide => (Square::E1, Square::G1, Square::H1, Square::F1),
            Castling::WhiteQueenSide => (Square::E1, Square::C1, Square::A1, Square::D1),
            Castling::BlackKingSide => (Square::E8, Square::G8, Square::H8, Square::F8),
            Castling::BlackQueenSide => (Square::E8, Square::C8, Square::A8, Square::D8),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Castling::WhiteKingSide => 'K',
            Castling::WhiteQueenSide => 'Q',
            Castling::BlackKingSide => 'k',
            Castling::BlackQueenSide => 'q',
        }
    }
}

/// Set of castling rights packed into the low four bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, c: Castling) -> bool { self.0 & c.bit() != 0 }
    #[inline]
    pub fn set(&mut self, c: Castling) { self.0 |= c.bit(); }
    #[inline]
    pub fn clear(&mut self, c: Castling) { self.0 &= !c.bit(); }
    #[inline]
    pub fn remove(&mut self, other: CastlingRights) { self.0 &= !other.0; }
    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }

    pub fn iter(self) -> impl Iterator<Item = Castling> {
        Castling::ALL.into_iter().filter(move |&c| self.has(c))
    }

    /// Rights lost when a piece leaves or lands on `sq`.
    pub fn touched_by(sq: Square) -> CastlingRights {
        match sq {
            Square::E1 => CastlingRights(Castling::WhiteKingSide.bit() | Castling::WhiteQueenSide.bit()),
            Square::H1 => CastlingRights(Castling::WhiteKingSide.bit()),
            Square::A1 => CastlingRights(Castling::WhiteQueenSide.bit()),
            Square::E8 => CastlingRights(Castling::BlackKingSide.bit() | Castling::BlackQueenSide.bit()),
            Square::H8 => CastlingRights(Castling::BlackKingSide.bit()),
            Square::A8 => CastlingRights(Castling::BlackQueenSide.bit()),
            _ => CastlingRights::NONE,
        }
    }
}
