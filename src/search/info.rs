use crossbeam_channel::Sender;
use serde::Serialize;
use std::time::Duration;

use super::eval::{is_mate_score, MATE_SCORE};
use crate::board::Move;

/// Score as reported to the outside: centipawns or moves to mate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    Cp(i32),
    /// Full moves to mate; negative when the side to move is mated.
    Mate(i32),
}

impl Score {
    pub fn from_internal(value: i32) -> Score {
        if is_mate_score(value) {
            let plies = MATE_SCORE - value.abs();
            let moves = (plies + 1) / 2;
            Score::Mate(if value > 0 { moves } else { -moves })
        } else {
            Score::Cp(value)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchStatus {
    pub depth: u32,
    pub max_depth: u32,
    pub nodes: u64,
    #[serde(with = "millis")]
    pub elapsed: Duration,
    pub nps: u64,
    pub current_move: Option<Move>,
    pub current_move_number: usize,
}

/// A new best line at the root.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PvInfo {
    pub depth: u32,
    pub max_depth: u32,
    pub score: Score,
    pub nodes: u64,
    #[serde(with = "millis")]
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

/// Terminal report; exactly one per search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestMove {
    pub best: Option<Move>,
    pub ponder: Option<Move>,
    pub score: Option<Score>,
    pub depth: u32,
    pub nodes: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchEvent {
    Status(SearchStatus),
    Pv(PvInfo),
    BestMove(BestMove),
}

/// Receives search callbacks on the search thread.
pub trait SearchListener: Send {
    fn notify(&mut self, event: SearchEvent);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

impl SearchListener for NullListener {
    fn notify(&mut self, _event: SearchEvent) {}
}

impl SearchListener for Sender<SearchEvent> {
    fn notify(&mut self, event: SearchEvent) {
        // The receiver may already be gone; the search still finishes normally.
        let _ = self.send(event);
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
