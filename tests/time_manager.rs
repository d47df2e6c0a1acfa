use pulsar::board::{Color, Position};
use pulsar::search::limits::DEFAULT_MOVES_TO_GO;
use pulsar::search::{Clock, NullListener, Score, Search, SearchMode};
use std::time::{Duration, Instant};

fn ms(v: u64) -> Duration { Duration::from_millis(v) }

#[test]
fn budget_formula() {
    let clock = Clock::new(ms(120_000), ms(0), ms(5_000), ms(100));
    // (114000 - 1000) / 40
    assert_eq!(clock.budget(Color::White), ms(2825));
    // (4750 - 1000 + 39 * 100) / 40
    assert_eq!(clock.budget(Color::Black), ms(191));
    assert_eq!(DEFAULT_MOVES_TO_GO, 40);
    assert_eq!(SearchMode::Clock(clock).budget(Color::Black), Some(ms(191)));
}

#[test]
fn clock_search_finishes_inside_a_short_budget() {
    let clock = Clock::new(ms(3_000), ms(0), ms(3_000), ms(0));
    let t0 = Instant::now();
    let out = Search::clock(Position::startpos(), clock).run(NullListener);
    assert!(out.best.best.is_some());
    assert!(out.best.depth >= 1, "first iteration always completes");
    assert!(t0.elapsed() < Duration::from_secs(2), "took {:?}", t0.elapsed());
}

#[test]
fn single_reply_stops_after_first_iteration() {
    // Kxb2 is the only legal move
    let pos = Position::from_fen("k7/8/8/8/8/8/1r6/K7 w - - 0 1").unwrap();
    let clock = Clock::new(ms(60_000), ms(0), ms(60_000), ms(0));
    let out = Search::clock(pos, clock).run(NullListener);
    assert_eq!(out.best.best.unwrap().to_string(), "a1b2");
    assert_eq!(out.best.depth, 1);
}

#[test]
fn proven_mate_stops_early() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let clock = Clock::new(ms(60_000), ms(0), ms(60_000), ms(0));
    let out = Search::clock(pos, clock).run(NullListener);
    assert_eq!(out.best.best.unwrap().to_string(), "a1a8");
    assert_eq!(out.best.score, Some(Score::Mate(1)));
    assert_eq!(out.best.depth, 1);
}
