// Pulse-style engine core: board state machine, perft and alpha-beta search
pub mod board;
pub mod error;
pub mod perft;
pub mod search;
pub mod uci;

pub use error::{ParseError, SearchError};
