use crossbeam_channel::unbounded;
use pulsar::board::Position;
use pulsar::search::eval::{material_eval_cp_side_agnostic, Evaluator, Material};
use pulsar::search::{NullListener, Score, Search, SearchEvent};

#[test]
fn eval_material_startpos_is_zeroish() {
    let b = Position::startpos();
    let cp = material_eval_cp_side_agnostic(&b);
    assert!(cp.abs() < 5, "startpos material not near zero: {cp}");
}

#[test]
fn eval_material_known_advantage() {
    // White: Kh1, Qe2; Black: Ka8, Qd2 (legal). Material equal.
    let b = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    assert_eq!(material_eval_cp_side_agnostic(&b), 0);
    let up = Position::from_fen("k7/8/8/8/8/8/4Q3/7K b - - 0 1").unwrap();
    assert!(material_eval_cp_side_agnostic(&up) > 900);
    assert!(Material.evaluate(&up) < -900, "side to move is down a queen");
}

#[test]
fn search_returns_legal_move_startpos() {
    let mut b = Position::startpos();
    let out = Search::depth(b.clone(), 1).run(NullListener);
    let bm = out.best.best.expect("no move found at depth 1");
    assert!(b.legal_moves().contains(&bm));
}

#[test]
fn search_prefers_winning_queen_capture() {
    // Qe2xd2 wins a queen
    let b = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    let out = Search::depth(b, 2).run(NullListener);
    let bm = out.best.best.expect("expected a best move");
    assert_eq!(bm.to_string(), "e2d2");
}

#[test]
fn depth_limit_is_respected() {
    let (tx, rx) = unbounded();
    let out = Search::depth(Position::startpos(), 3).run(tx);
    assert_eq!(out.best.depth, 3);
    let events: Vec<SearchEvent> = rx.try_iter().collect();
    let mut best_moves = 0;
    for ev in &events {
        match ev {
            SearchEvent::Status(s) => assert!(s.depth <= 3, "status beyond depth: {}", s.depth),
            SearchEvent::Pv(p) => {
                assert!(p.depth <= 3, "pv beyond depth: {}", p.depth);
                assert!(!p.pv.is_empty());
            }
            SearchEvent::BestMove(_) => best_moves += 1,
        }
    }
    assert_eq!(best_moves, 1);
    assert!(matches!(events.last(), Some(SearchEvent::BestMove(_))));
}

#[test]
fn ponder_move_comes_from_the_pv() {
    let out = Search::depth(Position::startpos(), 3).run(NullListener);
    let best = out.best.best.unwrap();
    let ponder = out.best.ponder.expect("depth 3 line has a reply");
    let mut pos = Position::startpos();
    pos.make_move(best);
    assert!(pos.legal_moves().contains(&ponder));
}

#[test]
fn finds_mate_in_two() {
    // Rook ladder: 1. Ra7 then 2. Rb8#
    let b = Position::from_fen("6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1").unwrap();
    let out = Search::depth(b, 4).run(NullListener);
    assert_eq!(out.best.score, Some(Score::Mate(2)));
}

#[test]
fn checkmated_and_stalemated_roots() {
    let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    let out = Search::depth(mated, 2).run(NullListener);
    assert_eq!(out.best.best, None);
    assert_eq!(out.best.ponder, None);

    let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let out = Search::depth(stalemate, 2).run(NullListener);
    assert_eq!(out.best.best, None);
}

#[test]
fn prefers_mate_over_stalemate() {
    // Qf7 stalemates, Qf8 mates
    let b = Position::from_fen("7k/8/6K1/8/8/8/5Q2/8 w - - 0 1").unwrap();
    let out = Search::depth(b, 3).run(NullListener);
    assert_ne!(out.best.best.unwrap().to_string(), "f2f7");
    assert_eq!(out.best.score, Some(Score::Mate(1)));
}

#[test]
fn repetition_draw_ends_the_pv() {
    // Black can repeat with Nh6-g8; any other move leaves a queen down
    let mut b = Position::from_fen("4k1n1/8/8/8/8/8/8/3QK1N1 w - - 0 1").unwrap();
    b.apply_uci_moves(&["g1h3", "g8h6", "h3g1", "h6g8", "g1h3", "g8h6", "h3g1"]).unwrap();
    let (tx, rx) = unbounded();
    let out = Search::depth(b, 2).run(tx);
    assert_eq!(out.best.best.map(|m| m.to_string()).as_deref(), Some("h6g8"));
    assert_eq!(out.best.score, Some(Score::Cp(0)));
    assert_eq!(out.best.ponder, None);

    let last_pv = rx
        .try_iter()
        .filter_map(|ev| match ev {
            SearchEvent::Pv(p) => Some(p),
            _ => None,
        })
        .last()
        .expect("a pv was reported");
    let line: Vec<String> = last_pv.pv.iter().map(|m| m.to_string()).collect();
    assert_eq!(line, ["h6g8"]);
}
