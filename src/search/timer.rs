use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, trace};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SearchError;

/// Messages the search thread polls at its check points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Stop,
    PonderHit,
    /// Sent by the time governor when its budget elapses.
    Deadline,
}

/// Background timer. Sleeps on a cancel channel (no polling) and, if the
/// budget runs out first, sends `Signal::Deadline` to the search.
pub struct TimeGovernor {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
    started: Instant,
    budget: Duration,
}

impl TimeGovernor {
    pub fn start(budget: Duration, signals: Sender<Signal>) -> Result<Self, SearchError> {
        let (cancel, cancelled) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("time-governor".into())
            .spawn(move || match cancelled.recv_timeout(budget) {
                Err(RecvTimeoutError::Timeout) => {
                    debug!("time budget of {budget:?} elapsed");
                    let _ = signals.send(Signal::Deadline);
                }
                _ => trace!("time governor cancelled"),
            })
            .map_err(|e| SearchError::Spawn("time-governor", e))?;
        Ok(Self { cancel, handle: Some(handle), started: Instant::now(), budget })
    }

    pub fn elapsed(&self) -> Duration { self.started.elapsed() }

    pub fn remaining(&self) -> Duration { self.budget.saturating_sub(self.elapsed()) }

    /// Cancels the timer and joins its thread. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.cancel.try_send(());
            let _ = handle.join();
        }
    }
}

impl Drop for TimeGovernor {
    fn drop(&mut self) { self.stop(); }
}
