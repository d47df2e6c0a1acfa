pub mod bitboard;
pub mod fen;
pub mod movegen;
pub mod movelist;
pub mod moves;
pub mod position;
pub mod types;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use movegen::{GenMode, MoveGenerator};
pub use movelist::{MoveList, MoveVariation, PvTable, ScoredMove};
pub use moves::{Move, MoveKind};
pub use position::{Position, STARTPOS_FEN};
pub use types::{Castling, CastlingRights, Color, Piece, PieceType, Square, MAX_DEPTH, MAX_PLY};
