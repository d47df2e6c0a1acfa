use crossbeam_channel::unbounded;
use pulsar::board::Position;
use pulsar::error::SearchError;
use pulsar::search::{Clock, NullListener, Search, SearchEvent, SearchState};
use pulsar::uci::UciEngine;
use std::thread;
use std::time::{Duration, Instant};

fn best_move_count(events: &[SearchEvent]) -> usize {
    events.iter().filter(|e| matches!(e, SearchEvent::BestMove(_))).count()
}

#[test]
fn stop_ends_infinite_search_with_one_best_move() {
    let (tx, rx) = unbounded();
    let mut handle = Search::infinite(Position::startpos()).start(tx).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert!(handle.is_running());

    let t0 = Instant::now();
    let outcome = handle.stop().unwrap();
    assert!(t0.elapsed() < Duration::from_secs(1), "stop took {:?}", t0.elapsed());
    assert_eq!(outcome.state, SearchState::Stopped);
    assert!(outcome.best.best.is_some());
    assert_eq!(outcome.position, Position::startpos());
    let first = outcome.best.clone();

    // Idempotent
    assert_eq!(handle.stop().unwrap().best, first);
    assert!(!handle.is_running());
    let events: Vec<SearchEvent> = rx.try_iter().collect();
    assert_eq!(best_move_count(&events), 1);
}

#[test]
fn infinite_search_waits_after_exhausting_depth() {
    // One legal reply that leaves bare kings: every iteration is trivial
    let pos = Position::from_fen("k7/8/8/8/8/8/1r6/K7 w - - 0 1").unwrap();
    let (tx, rx) = unbounded();
    let mut handle = Search::infinite(pos).start(tx).unwrap();
    thread::sleep(Duration::from_millis(100));
    assert!(handle.is_running(), "infinite search reported before stop");
    assert_eq!(best_move_count(&rx.try_iter().collect::<Vec<_>>()), 0);
    let outcome = handle.stop().unwrap();
    assert_eq!(outcome.best.best.unwrap().to_string(), "a1b2");
}

#[test]
fn ponderhit_turns_ponder_into_timed_search() {
    let clock = Clock::new(Duration::from_millis(2_000), Duration::ZERO, Duration::from_millis(2_000), Duration::ZERO);
    let (tx, rx) = unbounded();
    let mut handle = Search::ponder(Position::startpos(), clock).start(tx).unwrap();
    thread::sleep(Duration::from_millis(30));
    assert!(handle.is_running(), "ponder search must not finish on its own");

    let t0 = Instant::now();
    handle.ponderhit();
    let outcome = handle.join().unwrap();
    assert!(t0.elapsed() < Duration::from_secs(2), "ponderhit search took {:?}", t0.elapsed());
    assert_eq!(outcome.state, SearchState::Completed);
    assert!(outcome.best.best.is_some());
    assert!(outcome.best.depth >= 1);
    assert_eq!(best_move_count(&rx.try_iter().collect::<Vec<_>>()), 1);
}

#[test]
fn dropping_a_handle_stops_the_search() {
    let t0 = Instant::now();
    {
        let _handle = Search::infinite(Position::startpos()).start(NullListener).unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    assert!(t0.elapsed() < Duration::from_secs(2));
}

#[test]
fn go_while_searching_is_rejected() {
    let mut engine = UciEngine::new(Vec::new());
    engine.cmd_go("infinite").unwrap();
    assert!(engine.is_searching());
    assert!(matches!(engine.cmd_go("depth 1"), Err(SearchError::AlreadyRunning)));
    assert!(engine.handle_line("stop"));
    assert!(!engine.is_searching());

    let out = engine.output();
    let text = String::from_utf8(out.lock().unwrap().clone()).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("bestmove")).count(), 1, "{text}");
}

#[test]
fn uci_session_reports_bestmove_for_depth_search() {
    let mut engine = UciEngine::new(Vec::new());
    assert!(engine.handle_line("position startpos moves e2e4"));
    assert!(engine.handle_line("go depth 2"));
    // Wait for the search to finish on its own, then reap it with a new go
    let t0 = Instant::now();
    while engine.is_searching() && t0.elapsed() < Duration::from_secs(5) {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(engine.handle_line("go nodes 1"));
    assert!(!engine.handle_line("quit"));

    let out = engine.output();
    let text = String::from_utf8(out.lock().unwrap().clone()).unwrap();
    let best: Vec<&str> = text.lines().filter(|l| l.starts_with("bestmove")).collect();
    assert_eq!(best.len(), 2, "{text}");
    assert!(best[0].contains(" ponder "), "{}", best[0]);
    assert!(!best[1].contains(" ponder "), "{}", best[1]);
    assert!(text.contains("info depth 2"), "{text}");
}
