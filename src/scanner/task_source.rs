//! Bounded, closeable queue of ports for one target.
//!
//! A feeder task pushes ports into a bounded `mpsc` channel while workers pull
//! from the shared receiver. The feeder drops its sender when the port list is
//! exhausted; once the buffer drains, every `next` call returns `None`.

use crate::types::Port;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Consumer handle shared by every worker of a pool.
#[derive(Debug, Clone)]
pub struct TaskSource {
    receiver: Arc<Mutex<mpsc::Receiver<Port>>>,
}

impl TaskSource {
    /// Start feeding `ports` through a buffer of `capacity` slots.
    ///
    /// The returned handle resolves to the number of ports dispatched. The
    /// feeder blocks whenever the buffer is full.
    pub fn spawn(ports: Arc<[Port]>, capacity: usize) -> (Self, JoinHandle<usize>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let feeder = tokio::spawn(async move {
            let mut dispatched = 0;
            for &port in ports.iter() {
                if sender.send(port).await.is_err() {
                    debug!(dispatched, "every worker exited before the task source drained");
                    break;
                }
                dispatched += 1;
            }
            dispatched
        });

        let source = Self {
            receiver: Arc::new(Mutex::new(receiver)),
        };
        (source, feeder)
    }

    /// Take the next port, or `None` once the source is closed and empty.
    pub async fn next(&self) -> Option<Port> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}
