use crate::log_debug;
use crate::modules::resolver::application::FetchJob;
use crate::modules::resolver::worker::FetchQueue;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delays submission of scheduled lookups.
///
/// A lookup whose key was requested again during the delay is dropped when
/// its timer fires, so only the last request in a burst reaches the worker.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    queue: FetchQueue,
    shutdown: CancellationToken,
}

impl Debouncer {
    pub fn new(delay: Duration, queue: FetchQueue, shutdown: CancellationToken) -> Self {
        Self {
            delay,
            queue,
            shutdown,
        }
    }

    /// Start the timer for `job`. Must be called inside a tokio runtime.
    pub fn schedule(&self, job: FetchJob) {
        let delay = self.delay;
        let queue = self.queue.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            if !job.is_current() {
                log_debug!(
                    "Debounced lookup '{}' superseded (generation {})",
                    job.lookup_key,
                    job.token.generation()
                );
                return;
            }
            queue.submit(job);
        });
    }
}
