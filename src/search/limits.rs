use std::time::Duration;

use crate::board::{Color, MAX_DEPTH};

pub const DEFAULT_MOVES_TO_GO: u32 = 40;

/// Remaining clock time and increment for both sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    pub white_time: Duration,
    pub white_increment: Duration,
    pub black_time: Duration,
    pub black_increment: Duration,
    pub moves_to_go: Option<u32>,
}

impl Clock {
    pub fn new(white_time: Duration, white_increment: Duration, black_time: Duration, black_increment: Duration) -> Self {
        Self { white_time, white_increment, black_time, black_increment, moves_to_go: None }
    }

    pub fn with_moves_to_go(mut self, moves_to_go: u32) -> Self {
        self.moves_to_go = Some(moves_to_go);
        self
    }

    /// Per-move budget for `side`: keep 5% plus one second in reserve and
    /// spread the rest, increments included, over the moves to go.
    pub fn budget(&self, side: Color) -> Duration {
        let (left, inc) = match side {
            Color::White => (self.white_time, self.white_increment),
            Color::Black => (self.black_time, self.black_increment),
        };
        let moves_to_go = u64::from(self.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1));
        let left_ms = left.as_millis() as u64;
        let inc_ms = inc.as_millis() as u64;
        let usable = (left_ms * 95 / 100).saturating_sub(1000);
        let per_move = (usable + (moves_to_go - 1) * inc_ms) / moves_to_go;
        Duration::from_millis(per_move.min(usable))
    }
}

/// How a search decides when to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Complete iterations up to this depth.
    Depth(u32),
    /// Stop once this many nodes have been visited.
    Nodes(u64),
    /// Fixed wall-clock budget; the deadline aborts immediately.
    Time(Duration),
    /// Budget derived from the clock, with time management.
    Clock(Clock),
    /// Until stopped.
    Infinite,
    /// Infinite until `ponderhit`, then a clock search.
    Ponder(Clock),
}

impl SearchMode {
    pub fn max_depth(&self) -> u32 {
        match *self {
            SearchMode::Depth(d) => d.clamp(1, MAX_DEPTH),
            _ => MAX_DEPTH,
        }
    }

    pub fn node_limit(&self) -> u64 {
        match *self {
            SearchMode::Nodes(n) => n.max(1),
            _ => u64::MAX,
        }
    }

    /// Timer budget, if this mode is timed at all.
    pub fn budget(&self, side: Color) -> Option<Duration> {
        match self {
            SearchMode::Time(t) => Some(*t),
            SearchMode::Clock(c) | SearchMode::Ponder(c) => Some(c.budget(side)),
            _ => None,
        }
    }

    /// Whether the timer should be armed as soon as the search starts.
    pub fn starts_timer(&self) -> bool { matches!(self, SearchMode::Time(_) | SearchMode::Clock(_)) }

    /// Whether the root consults the time budget between iterations.
    pub fn manages_time(&self) -> bool { matches!(self, SearchMode::Clock(_)) }

    /// Searches that must not report a best move until told to.
    pub fn waits_for_stop(&self) -> bool { matches!(self, SearchMode::Infinite | SearchMode::Ponder(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration { Duration::from_millis(v) }

    #[test]
    fn budget_reserves_time_and_splits_over_moves() {
        let c = Clock::new(ms(60_000), ms(0), ms(30_000), ms(0));
        // (57000 - 1000) / 40
        assert_eq!(c.budget(Color::White), ms(1400));
        // (28500 - 1000) / 40
        assert_eq!(c.budget(Color::Black), ms(687));
    }

    #[test]
    fn budget_uses_increments_and_caps_at_usable() {
        let c = Clock::new(ms(10_000), ms(2_000), ms(10_000), ms(2_000)).with_moves_to_go(5);
        // usable 8500, (8500 + 4 * 2000) / 5 = 3300
        assert_eq!(c.budget(Color::White), ms(3300));
        let tight = Clock::new(ms(2_000), ms(5_000), ms(2_000), ms(5_000)).with_moves_to_go(10);
        // usable 900, (900 + 9 * 5000) / 10 capped at 900
        assert_eq!(tight.budget(Color::Black), ms(900));
    }

    #[test]
    fn low_clock_yields_zero_budget() {
        let c = Clock::new(ms(1_000), ms(0), ms(1_000), ms(0));
        assert_eq!(c.budget(Color::White), Duration::ZERO);
    }

    #[test]
    fn mode_limits() {
        assert_eq!(SearchMode::Depth(0).max_depth(), 1);
        assert_eq!(SearchMode::Depth(500).max_depth(), MAX_DEPTH);
        assert_eq!(SearchMode::Nodes(1).node_limit(), 1);
        assert_eq!(SearchMode::Infinite.budget(Color::White), None);
        assert!(SearchMode::Ponder(Clock::default()).waits_for_stop());
        assert!(!SearchMode::Ponder(Clock::default()).starts_timer());
    }
}
