/// Background worker draining scheduled fetch jobs
///
/// Jobs are taken in submission order. A semaphore bounds how many run at
/// once (one by default), and the generation of each job is re-checked at
/// dequeue so stale work never reaches the network.
use crate::modules::resolver::application::{FetchJob, FetchOrchestrator};
use crate::{log_debug, log_info, log_warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

/// Submission side of the worker queue
#[derive(Clone)]
pub struct FetchQueue {
    sender: mpsc::UnboundedSender<FetchJob>,
}

impl FetchQueue {
    /// Returns false when the worker has shut down
    pub fn submit(&self, job: FetchJob) -> bool {
        match self.sender.send(job) {
            Ok(()) => true,
            Err(rejected) => {
                log_warn!(
                    "Fetch worker stopped, dropping lookup '{}'",
                    rejected.0.lookup_key
                );
                false
            }
        }
    }
}

pub struct FetchWorker {
    orchestrator: Arc<FetchOrchestrator>,
    receiver: Mutex<mpsc::UnboundedReceiver<FetchJob>>,
    permits: Arc<Semaphore>,
    pool_size: usize,
    shutdown: CancellationToken,
}

impl FetchWorker {
    /// Create the worker and the queue feeding it
    pub fn new(
        orchestrator: Arc<FetchOrchestrator>,
        pool_size: usize,
        shutdown: CancellationToken,
    ) -> (Self, FetchQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pool_size = pool_size.max(1);
        let worker = Self {
            orchestrator,
            receiver: Mutex::new(receiver),
            permits: Arc::new(Semaphore::new(pool_size)),
            pool_size,
            shutdown,
        };
        (worker, FetchQueue { sender })
    }

    /// Run the worker loop until `stop` is called.
    ///
    /// Spawn it with `tokio::spawn`; jobs run on their own tasks while holding
    /// a pool permit.
    pub async fn run(self: Arc<Self>) {
        log_info!("Fetch worker started (pool size {})", self.pool_size);
        let mut receiver = self.receiver.lock().await;

        loop {
            let job = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                job = receiver.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            let permit = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                permit = Arc::clone(&self.permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            if !job.is_current() {
                log_debug!("Skipping superseded lookup '{}'", job.lookup_key);
                continue;
            }

            let orchestrator = Arc::clone(&self.orchestrator);
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                let _permit = permit;
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        log_debug!("Lookup '{}' cancelled by shutdown", job.lookup_key);
                    }
                    outcome = orchestrator.run(&job) => {
                        log_debug!("Lookup '{}' finished: {:?}", job.lookup_key, outcome);
                        job.token.release();
                    }
                }
            });
        }

        log_info!("Fetch worker stopped");
    }

    /// Stop the worker loop and cancel in-flight jobs
    pub fn stop(&self) {
        self.shutdown.cancel();
        log_info!("Fetch worker stop requested");
    }

    /// Wait until no job holds a pool permit
    pub async fn drain(&self) {
        let all = u32::try_from(self.pool_size).unwrap_or(u32::MAX);
        if let Ok(permits) = self.permits.acquire_many(all).await {
            drop(permits);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
