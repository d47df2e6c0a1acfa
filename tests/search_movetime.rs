use pulsar::board::Position;
use pulsar::search::{NullListener, Search};
use std::time::{Duration, Instant};

#[test]
fn movetime_returns_quickly_with_move() {
    let t0 = Instant::now();
    let out = Search::time(Position::startpos(), Duration::from_millis(10)).run(NullListener);
    let elapsed = t0.elapsed();
    assert!(out.best.best.is_some(), "no bestmove under movetime");
    assert!(out.best.nodes > 0, "expected nodes>0 under movetime");
    assert!(elapsed < Duration::from_millis(500), "search exceeded time: {:?}", elapsed);
}

#[test]
fn zero_movetime_still_yields_a_legal_move() {
    let mut pos = Position::startpos();
    let out = Search::time(pos.clone(), Duration::ZERO).run(NullListener);
    let best = out.best.best.expect("fallback move");
    assert!(pos.legal_moves().contains(&best));
}

#[test]
fn nodes_limit_of_one_reports_first_move_without_ponder() {
    let mut pos = Position::startpos();
    let out = Search::nodes(pos.clone(), 1).run(NullListener);
    assert_eq!(out.best.nodes, 1);
    assert_eq!(out.best.depth, 0);
    assert_eq!(out.best.ponder, None);
    assert_eq!(out.best.score, None);
    assert!(pos.legal_moves().contains(&out.best.best.expect("a move")));
}

#[test]
fn node_budget_caps_work() {
    let out = Search::nodes(Position::startpos(), 5_000).run(NullListener);
    assert!(out.best.nodes <= 5_000, "visited {} nodes", out.best.nodes);
    assert!(out.best.best.is_some());
}
