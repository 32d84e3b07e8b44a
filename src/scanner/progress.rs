//! Completion counting and periodic progress sampling.

use crate::scanner::traits::ProgressReporter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};

/// Default sampling cadence.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Number of tasks finished for the current target.
///
/// Workers call [`record`](Self::record) after publishing a result; observers
/// call [`sample`](Self::sample). The value never decreases.
#[derive(Debug, Default)]
pub struct CompletionCounter {
    completed: AtomicUsize,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished task, returning the new total.
    pub fn record(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn sample(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }
}

/// Observes a [`CompletionCounter`] until it reaches the task count.
pub struct ProgressTracker {
    target: String,
    total: usize,
    counter: Arc<CompletionCounter>,
    reporter: Arc<dyn ProgressReporter>,
    cadence: Duration,
}

impl ProgressTracker {
    pub fn new(
        target: impl Into<String>,
        total: usize,
        counter: Arc<CompletionCounter>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            target: target.into(),
            total,
            counter,
            reporter,
            cadence: PROGRESS_INTERVAL,
        }
    }

    /// Override the sampling cadence.
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Sample until the counter reaches the total, or until `finished` fires.
    ///
    /// `finished` lets the scan end without waiting for the next tick; the
    /// tracker still reports one last sample before returning it.
    pub async fn run(self, mut finished: oneshot::Receiver<()>) -> usize {
        let mut ticker = interval(self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let done = self.observe();
                    if done >= self.total {
                        return done;
                    }
                }
                _ = &mut finished => return self.observe(),
            }
        }
    }

    fn observe(&self) -> usize {
        let done = self.counter.sample().min(self.total);
        self.reporter.update(&self.target, done, self.total);
        done
    }
}
