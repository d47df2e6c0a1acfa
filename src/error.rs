use thiserror::Error;

use crate::board::Color;

/// Malformed position description or protocol move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 4 to 6 FEN fields, found {0}")]
    FieldCount(usize),
    #[error("invalid piece placement '{0}'")]
    Placement(String),
    #[error("invalid piece character '{0}'")]
    Piece(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling character '{0}'")]
    Castling(char),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move clock '{0}'")]
    Clock(String),
    #[error("{0:?} must have exactly one king")]
    KingCount(Color),
    #[error("side not to move is in check")]
    InconsistentSideToMove,
    #[error("illegal or malformed move '{0}'")]
    IllegalMove(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("a search is already running")]
    AlreadyRunning,
    #[error("failed to spawn {0} thread")]
    Spawn(&'static str, #[source] std::io::Error),
    #[error("search thread exited before it started")]
    StartFailed,
    #[error("search thread panicked")]
    Panicked,
}
