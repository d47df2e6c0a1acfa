use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace, warn};
use std::time::{Duration, Instant};

use super::eval::{is_mate_score, Evaluator, Material, DRAW_SCORE, INFINITE, MATE_SCORE};
use super::info::{BestMove, NullListener, PvInfo, Score, SearchEvent, SearchListener, SearchStatus};
use super::limits::SearchMode;
use super::timer::{Signal, TimeGovernor};
use crate::board::{Color, Move, MoveGenerator, MoveVariation, Position, PvTable, MAX_PLY};

/// Nodes between polls of the control channel.
pub const CHECK_INTERVAL: u64 = 1024;
const STATUS_INTERVAL: Duration = Duration::from_secs(1);
/// Expected growth of one iteration over the previous one.
const BRANCHING_ESTIMATE: u32 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct RootMove {
    pub mv: Move,
    pub score: i32,
    pub pv: MoveVariation,
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// Ran to its own limit (depth, nodes, time).
    Completed,
    /// Ended by an explicit stop.
    Stopped,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub best: BestMove,
    pub state: SearchState,
    /// The searched position, handed back unchanged.
    pub position: Position,
}

pub struct Searcher {
    pos: Position,
    evaluator: Box<dyn Evaluator>,
    listener: Box<dyn SearchListener>,
    mode: SearchMode,
    root_side: Color,
    signals: Receiver<Signal>,
    signal_tx: Sender<Signal>,
    timer: Option<TimeGovernor>,

    generators: Vec<MoveGenerator>,
    pv: PvTable,
    root_moves: Vec<RootMove>,
    completed: Option<(u32, RootMove)>,

    max_depth: u32,
    node_limit: u64,
    time_managed: bool,
    timer_stopped: bool,
    pondering: bool,
    /// Infinite and pondering searches hold their best move until released.
    awaits_release: bool,
    stopped: bool,
    abort: bool,

    nodes: u64,
    initial_depth: u32,
    current_depth: u32,
    current_max_depth: u32,
    current_move: Option<Move>,
    current_move_number: usize,
    start_time: Instant,
    status_time: Instant,
    last_iteration: Duration,
}

impl Searcher {
    pub fn new(
        pos: Position,
        mode: SearchMode,
        evaluator: Box<dyn Evaluator>,
        listener: Box<dyn SearchListener>,
        signals: Receiver<Signal>,
        signal_tx: Sender<Signal>,
    ) -> Self {
        let now = Instant::now();
        Self {
            root_side: pos.side_to_move(),
            pos,
            evaluator,
            listener,
            mode,
            signals,
            signal_tx,
            timer: None,
            generators: (0..MAX_PLY).map(|_| MoveGenerator::new()).collect(),
            pv: PvTable::new(),
            root_moves: Vec::new(),
            completed: None,
            max_depth: mode.max_depth(),
            node_limit: mode.node_limit(),
            time_managed: mode.manages_time(),
            timer_stopped: false,
            pondering: matches!(mode, SearchMode::Ponder(_)),
            awaits_release: mode.waits_for_stop(),
            stopped: false,
            abort: false,
            nodes: 0,
            initial_depth: 1,
            current_depth: 1,
            current_max_depth: 0,
            current_move: None,
            current_move_number: 0,
            start_time: now,
            status_time: now,
            last_iteration: Duration::ZERO,
        }
    }

    /// Iterative deepening. Reports every completed depth and exactly one
    /// best move; an iteration cut short by an abort is thrown away.
    pub fn run(mut self) -> SearchOutcome {
        self.start_time = Instant::now();
        self.status_time = self.start_time;
        debug!("search started: {:?}", self.mode);
        if self.mode.starts_timer() { self.arm_timer(); }

        let root = self.generators[0].generate_legal(&mut self.pos);
        root.rate_mvv_lva();
        root.sort();
        self.root_moves = root.moves().map(|mv| RootMove { mv, score: -INFINITE, pv: MoveVariation::new() }).collect();
        if self.root_moves.is_empty() {
            debug!("no legal moves at the root");
            self.abort = true;
        }

        self.send_status(true);
        let mut depth = self.initial_depth;
        while !self.abort && depth <= self.max_depth {
            self.current_depth = depth;
            self.current_max_depth = 0;
            let started = Instant::now();
            self.search_root(depth, -INFINITE, INFINITE);
            if self.abort { break; }

            // Best move first for the next iteration
            self.root_moves.sort_by(|a, b| b.score.cmp(&a.score));
            self.completed = Some((depth, self.root_moves[0].clone()));
            self.last_iteration = started.elapsed();
            trace!("depth {depth} done in {:?}, {} nodes", self.last_iteration, self.nodes);
            self.send_status(true);
            self.check_stop_conditions();
            depth += 1;
        }

        if !self.stopped && self.awaits_release {
            self.wait_for_release();
        }
        if let Some(mut timer) = self.timer.take() { timer.stop(); }

        let best = self.best_move();
        self.send_status(true);
        debug!("search finished: best {:?} after {} nodes", best.best.map(|m| m.to_string()), self.nodes);
        self.listener.notify(SearchEvent::BestMove(best.clone()));
        let state = if self.stopped { SearchState::Stopped } else { SearchState::Completed };
        SearchOutcome { best, state, position: self.pos }
    }

    fn best_move(&self) -> BestMove {
        match &self.completed {
            Some((depth, rm)) => BestMove {
                best: Some(rm.mv),
                ponder: rm.pv.moves().get(1).copied(),
                score: Some(Score::from_internal(rm.score)),
                depth: *depth,
                nodes: self.nodes,
            },
            // Nothing completed: fall back to the first legal move, if any.
            None => BestMove {
                best: self.root_moves.first().map(|rm| rm.mv),
                ponder: None,
                score: None,
                depth: 0,
                nodes: self.nodes,
            },
        }
    }

    fn search_root(&mut self, depth: u32, mut alpha: i32, beta: i32) {
        let ply = 0;
        self.update_search(ply);
        if self.abort { return; }

        // Reset so the sort pushes this iteration's best to the front
        for rm in self.root_moves.iter_mut() { rm.score = -INFINITE; }

        for i in 0..self.root_moves.len() {
            let mv = self.root_moves[i].mv;
            self.current_move = Some(mv);
            self.current_move_number = i + 1;
            self.send_status(false);

            self.pos.make_move(mv);
            let in_check = self.pos.is_check();
            let value = -self.search(depth as i32 - 1, -beta, -alpha, ply + 1, in_check);
            self.pos.undo_move(mv);
            if self.abort { return; }

            if value > alpha {
                alpha = value;
                self.pv.copy_pv(ply + 1, ply, mv);
                let rm = &mut self.root_moves[i];
                rm.score = value;
                rm.pv = self.pv.line(ply).clone();
                self.send_pv(value, i);
            }
        }
    }

    /// Negamax alpha-beta.
    ///
    /// Scores are from the perspective of the side to move at `ply`. A caller
    /// must negate the result and pass the swapped window `(-beta, -alpha)`.
    /// Fail-hard: a cutoff returns exactly `beta`, and a node with no move
    /// above `alpha` returns `alpha`.
    fn search(&mut self, depth: i32, mut alpha: i32, beta: i32, ply: usize, in_check: bool) -> i32 {
        if depth <= 0 { return self.quiescent(0, alpha, beta, ply, in_check); }

        self.update_search(ply);
        if self.abort || ply >= MAX_PLY - 1 { return self.evaluator.evaluate(&self.pos); }
        if self.pos.is_repetition() || self.pos.has_insufficient_material() || self.pos.is_fifty_move_draw() {
            return DRAW_SCORE;
        }

        let us = self.pos.side_to_move();
        let count = self.generators[ply].generate_for_search(&self.pos, depth, in_check).len();
        let mut searched = 0;
        for i in 0..count {
            let mv = self.generators[ply].list().get(i);
            self.pos.make_move(mv);
            let mut value = None;
            if !self.pos.is_check_for(us) {
                searched += 1;
                let gives_check = self.pos.is_check();
                value = Some(-self.search(depth - 1, -beta, -alpha, ply + 1, gives_check));
            }
            self.pos.undo_move(mv);
            if self.abort { return alpha; }

            if let Some(v) = value {
                if v > alpha {
                    if v >= beta { return beta; }
                    alpha = v;
                    self.pv.copy_pv(ply + 1, ply, mv);
                }
            }
        }

        if searched == 0 {
            // Checkmate, scored so that shorter mates are preferred, or stalemate
            return if in_check { -MATE_SCORE + ply as i32 } else { DRAW_SCORE };
        }
        alpha
    }

    /// Captures and promotions only, or every evasion when in check. Same
    /// negamax contract as `search`; the static evaluation is the stand-pat
    /// lower bound when not in check.
    fn quiescent(&mut self, depth: i32, mut alpha: i32, beta: i32, ply: usize, in_check: bool) -> i32 {
        self.update_search(ply);
        if self.abort || ply >= MAX_PLY - 1 { return self.evaluator.evaluate(&self.pos); }
        if self.pos.has_insufficient_material() { return DRAW_SCORE; }

        if !in_check {
            let stand = self.evaluator.evaluate(&self.pos);
            if stand >= beta { return beta; }
            if stand > alpha { alpha = stand; }
        }

        let us = self.pos.side_to_move();
        let count = self.generators[ply].generate_for_search(&self.pos, depth, in_check).len();
        let mut searched = 0;
        for i in 0..count {
            let mv = self.generators[ply].list().get(i);
            self.pos.make_move(mv);
            let mut value = None;
            if !self.pos.is_check_for(us) {
                searched += 1;
                let gives_check = self.pos.is_check();
                value = Some(-self.quiescent(depth - 1, -beta, -alpha, ply + 1, gives_check));
            }
            self.pos.undo_move(mv);
            if self.abort { return alpha; }

            if let Some(v) = value {
                if v > alpha {
                    if v >= beta { return beta; }
                    alpha = v;
                    self.pv.copy_pv(ply + 1, ply, mv);
                }
            }
        }

        if searched == 0 && in_check { return -MATE_SCORE + ply as i32; }
        alpha
    }

    /// Node bookkeeping on entry. Clears this ply's line first so an early
    /// return never leaves a sibling's moves behind for the parent to copy.
    fn update_search(&mut self, ply: usize) {
        self.pv.clear(ply);
        self.nodes += 1;
        if ply as u32 > self.current_max_depth { self.current_max_depth = ply as u32; }
        if self.nodes >= self.node_limit { self.abort = true; }
        if self.nodes % CHECK_INTERVAL == 0 {
            self.poll_signals();
            self.send_status(false);
        }
    }

    fn poll_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() { self.handle_signal(signal); }
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Stop => {
                debug!("stop requested");
                self.stopped = true;
                self.abort = true;
            }
            Signal::Deadline => {
                self.timer_stopped = true;
                // With time management the first iteration always completes
                if !self.time_managed || self.current_depth > self.initial_depth { self.abort = true; }
            }
            Signal::PonderHit => {
                if self.pondering {
                    debug!("ponderhit after {:?}", self.start_time.elapsed());
                    self.pondering = false;
                    self.awaits_release = false;
                    self.time_managed = true;
                    self.arm_timer();
                    self.check_stop_conditions();
                }
            }
        }
    }

    /// Time-management checks between iterations (and on ponderhit).
    fn check_stop_conditions(&mut self) {
        self.poll_signals();
        if !self.time_managed || self.abort { return; }
        if self.timer_stopped {
            self.abort = true;
            return;
        }
        // A single legal reply needs no further thought
        if self.root_moves.len() == 1 {
            self.abort = true;
            return;
        }
        if let Some((depth, rm)) = &self.completed {
            if is_mate_score(rm.score) && *depth as i32 >= MATE_SCORE - rm.score.abs() {
                self.abort = true;
                return;
            }
        }
        if let Some(timer) = &self.timer {
            if self.last_iteration * BRANCHING_ESTIMATE > timer.remaining() {
                trace!("next iteration would exceed the remaining {:?}", timer.remaining());
                self.abort = true;
            }
        }
    }

    fn arm_timer(&mut self) {
        let Some(budget) = self.mode.budget(self.root_side) else { return };
        match TimeGovernor::start(budget, self.signal_tx.clone()) {
            Ok(timer) => {
                debug!("time governor armed for {budget:?}");
                self.timer = Some(timer);
            }
            // Node and depth limits still bound the search
            Err(e) => warn!("{e}; searching without a deadline"),
        }
    }

    /// Blocks until the protocol releases an infinite or pondering search.
    fn wait_for_release(&mut self) {
        debug!("search exhausted; waiting for stop or ponderhit");
        loop {
            match self.signals.recv() {
                Ok(Signal::Stop) => {
                    self.stopped = true;
                    break;
                }
                Ok(Signal::PonderHit) if self.pondering => {
                    self.pondering = false;
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    }

    fn elapsed(&self) -> Duration { self.start_time.elapsed() }

    fn nps(&self) -> u64 {
        let ms = self.elapsed().as_millis() as u64;
        if ms > 0 { self.nodes * 1000 / ms } else { 0 }
    }

    fn send_status(&mut self, force: bool) {
        let now = Instant::now();
        if !force && now.duration_since(self.status_time) < STATUS_INTERVAL { return; }
        self.status_time = now;
        let status = SearchStatus {
            depth: self.current_depth,
            max_depth: self.current_max_depth,
            nodes: self.nodes,
            elapsed: self.elapsed(),
            nps: self.nps(),
            current_move: self.current_move,
            current_move_number: self.current_move_number,
        };
        self.listener.notify(SearchEvent::Status(status));
    }

    fn send_pv(&mut self, value: i32, index: usize) {
        let info = PvInfo {
            depth: self.current_depth,
            max_depth: self.current_max_depth,
            score: Score::from_internal(value),
            nodes: self.nodes,
            elapsed: self.elapsed(),
            pv: self.root_moves[index].pv.moves().to_vec(),
        };
        self.listener.notify(SearchEvent::Pv(info));
    }
}

/// Quiescence score of `pos` for the side to move, full window.
pub fn qsearch_eval_cp(pos: &Position) -> i32 {
    let (tx, rx) = unbounded();
    let in_check = pos.is_check();
    let mut s = Searcher::new(pos.clone(), SearchMode::Infinite, Box::new(Material), Box::new(NullListener), rx, tx);
    s.quiescent(0, -INFINITE, INFINITE, 0, in_check)
}
