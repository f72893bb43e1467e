use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::{run_all, BenchmarkRunReport, RunConfig, VariantRegistry, WorkerError};

#[derive(Debug)]
pub struct RunRequest {
    pub config: RunConfig,
    pub resp_tx: oneshot::Sender<BenchmarkRunReport>,
}

/// Owns the registry and runs benchmarks on its own OS thread, so blocking
/// inference never stalls the caller's runtime.
///
/// `running` is set by [`WorkerHandle::run`] and cleared here once the run is
/// over, so it stays set even if the requester stops waiting.
pub struct Worker {
    pub inbox: mpsc::Receiver<RunRequest>,
    pub registry: VariantRegistry,
    pub running: Arc<AtomicBool>,
}

impl Worker {
    pub fn spawn(registry: VariantRegistry) -> Result<WorkerHandle, WorkerError> {
        let (tx, inbox) = mpsc::channel(1);
        let running = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            inbox,
            registry,
            running: running.clone(),
        };
        std::thread::Builder::new()
            .name("bench-worker".to_string())
            .spawn(move || worker.run())?;
        Ok(WorkerHandle { tx, running })
    }

    pub fn run(mut self) {
        info!(variants = self.registry.len(), "worker started");
        while let Some(req) = self.inbox.blocking_recv() {
            debug!(iterations = req.config.iterations, "run started");
            let report = run_all(&mut self.registry, &req.config);
            self.running.store(false, Ordering::Release);
            if req.resp_tx.send(report).is_err() {
                debug!("run requester went away before the report was ready");
            }
        }
        info!("worker stopped");
    }
}

#[derive(Clone, Debug)]
pub struct WorkerHandle {
    tx: mpsc::Sender<RunRequest>,
    running: Arc<AtomicBool>,
}

impl WorkerHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Requests one run. Only one run may be in flight; a second request
    /// while one is running is rejected rather than queued. Dropping the
    /// returned future does not end the run on the worker, and the handle
    /// stays busy until it does.
    pub async fn run(&self, config: RunConfig) -> Result<BenchmarkRunReport, WorkerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkerError::Busy);
        }

        let (resp_tx, resp_rx) = oneshot::channel();
        // The flag is set, so the worker is idle and the inbox has room.
        if let Err(err) = self.tx.try_send(RunRequest { config, resp_tx }) {
            self.running.store(false, Ordering::Release);
            return Err(match err {
                mpsc::error::TrySendError::Closed(_) => WorkerError::Gone,
                mpsc::error::TrySendError::Full(_) => WorkerError::Busy,
            });
        }
        resp_rx.await.map_err(|_| WorkerError::Gone)
    }
}
