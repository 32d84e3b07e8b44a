//! Pool workers.
//!
//! Each worker loops: take a port, probe it, publish the result, count it.
//! It exits when the task source reports exhaustion.

use crate::scanner::progress::CompletionCounter;
use crate::scanner::task_source::TaskSource;
use crate::scanner::traits::{PortProber, ScanResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub(crate) struct Worker {
    pub id: usize,
    pub target: Arc<str>,
    pub tasks: TaskSource,
    pub results: mpsc::Sender<ScanResult>,
    pub counter: Arc<CompletionCounter>,
    pub prober: Arc<dyn PortProber>,
}

impl Worker {
    /// Drain the task source, returning how many tasks this worker handled.
    pub async fn run(self) -> usize {
        debug!(worker = self.id, target_host = %self.target, "worker started");
        let mut handled = 0;

        while let Some(port) = self.tasks.next().await {
            let result = self.prober.probe(&self.target, port).await;

            if self.results.send(result).await.is_err() {
                warn!(worker = self.id, "result sink closed, abandoning remaining tasks");
                break;
            }
            self.counter.record();
            handled += 1;
        }

        debug!(worker = self.id, handled, "worker exited");
        handled
    }
}
