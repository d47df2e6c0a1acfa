use crossbeam_channel::{bounded, unbounded, Sender};
use log::debug;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::alphabeta::{SearchOutcome, Searcher};
use super::eval::{Evaluator, Material};
use super::info::SearchListener;
use super::limits::{Clock, SearchMode};
use super::timer::Signal;
use crate::board::Position;
use crate::error::SearchError;

/// A configured search that has not started yet. Owns its position; the
/// position is handed back in the `SearchOutcome`.
pub struct Search {
    position: Position,
    mode: SearchMode,
    evaluator: Box<dyn Evaluator>,
}

impl Search {
    pub fn new(position: Position, mode: SearchMode) -> Self {
        Self { position, mode, evaluator: Box::new(Material) }
    }

    pub fn depth(position: Position, depth: u32) -> Self { Self::new(position, SearchMode::Depth(depth)) }

    pub fn nodes(position: Position, nodes: u64) -> Self { Self::new(position, SearchMode::Nodes(nodes)) }

    pub fn time(position: Position, movetime: Duration) -> Self { Self::new(position, SearchMode::Time(movetime)) }

    pub fn clock(position: Position, clock: Clock) -> Self { Self::new(position, SearchMode::Clock(clock)) }

    pub fn infinite(position: Position) -> Self { Self::new(position, SearchMode::Infinite) }

    pub fn ponder(position: Position, clock: Clock) -> Self { Self::new(position, SearchMode::Ponder(clock)) }

    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Runs on the calling thread. Infinite and ponder searches can only be
    /// released through `start`.
    pub fn run(self, listener: impl SearchListener + 'static) -> SearchOutcome {
        let (tx, rx) = unbounded();
        Searcher::new(self.position, self.mode, self.evaluator, Box::new(listener), rx, tx).run()
    }

    /// Spawns the search thread and returns once it is running.
    pub fn start(self, listener: impl SearchListener + 'static) -> Result<SearchHandle, SearchError> {
        let (signals, signal_rx) = unbounded();
        let (started_tx, started_rx) = bounded::<()>(0);
        let timer_tx = signals.clone();
        let Search { position, mode, evaluator } = self;

        let thread = thread::Builder::new()
            .name("search".into())
            .spawn(move || {
                let searcher = Searcher::new(position, mode, evaluator, Box::new(listener), signal_rx, timer_tx);
                let _ = started_tx.send(());
                searcher.run()
            })
            .map_err(|e| SearchError::Spawn("search", e))?;

        started_rx.recv().map_err(|_| SearchError::StartFailed)?;
        debug!("search thread running: {mode:?}");
        Ok(SearchHandle { signals, thread: Some(thread), outcome: None })
    }
}

/// Control side of a running search.
pub struct SearchHandle {
    signals: Sender<Signal>,
    thread: Option<JoinHandle<SearchOutcome>>,
    outcome: Option<SearchOutcome>,
}

impl SearchHandle {
    pub fn is_running(&self) -> bool { self.thread.as_ref().is_some_and(|t| !t.is_finished()) }

    /// Asks the search to stop and waits for it. Calling it again returns the
    /// same outcome.
    pub fn stop(&mut self) -> Result<&SearchOutcome, SearchError> {
        if self.thread.is_some() { let _ = self.signals.send(Signal::Stop); }
        self.join()
    }

    /// Switches a pondering search to its clock budget. No effect otherwise.
    pub fn ponderhit(&self) {
        if self.thread.is_some() { let _ = self.signals.send(Signal::PonderHit); }
    }

    /// Waits for the search to end on its own.
    pub fn join(&mut self) -> Result<&SearchOutcome, SearchError> {
        if let Some(thread) = self.thread.take() {
            self.outcome = Some(thread.join().map_err(|_| SearchError::Panicked)?);
        }
        self.outcome.as_ref().ok_or(SearchError::Panicked)
    }

    pub fn into_outcome(mut self) -> Result<SearchOutcome, SearchError> {
        self.join()?;
        self.outcome.take().ok_or(SearchError::Panicked)
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.stop();
        }
    }
}
