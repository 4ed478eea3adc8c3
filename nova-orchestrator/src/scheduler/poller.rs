//! Job poller
//!
//! Repeatedly asks the job service to process one job, sleeping a fixed
//! interval between iterations. The poller is an owned handle: start it,
//! then shut it down (or drop it) to stop the background task.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::service::JobService;

/// Errors reported when stopping a poller
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("poller did not stop within {0:?}")]
    ShutdownTimedOut(Duration),

    #[error("poller task panicked: {0}")]
    Panicked(#[from] tokio::task::JoinError),
}

/// Background poller bound to one [`JobService`]
pub struct Poller {
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Default delay between iterations
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    /// Spawns the polling loop on the current tokio runtime
    pub fn start(service: JobService, interval: Duration) -> Self {
        info!("Starting job poller (interval: {:?})", interval);

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(service, interval, shutdown.clone()));

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signals the loop to stop and waits up to `timeout` for it to exit.
    ///
    /// A job being processed when the signal arrives is finished first.
    pub async fn shutdown(mut self, timeout: Duration) -> Result<(), PollerError> {
        self.shutdown.cancel();

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match time::timeout(timeout, handle).await {
            Ok(joined) => {
                joined?;
                info!("Job poller stopped");
                Ok(())
            }
            Err(_) => Err(PollerError::ShutdownTimedOut(timeout)),
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run(service: JobService, interval: Duration, shutdown: CancellationToken) {
    loop {
        if shutdown.is_cancelled() {
            break;
        }

        match service.process_next().await {
            Ok(true) => debug!("Processed one job"),
            Ok(false) => trace!("No queued jobs"),
            Err(e) => error!("Error during poll cycle: {}", e),
        }

        if shutdown.is_cancelled() {
            break;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = time::sleep(interval) => {}
        }
    }

    debug!("Job poller loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_pool;
    use crate::service::SimulatedExecutor;
    use nova_core::domain::job::{JobStatus, Payload};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_poller_processes_queue_and_stops() {
        let service = JobService::new(temp_pool().await, Arc::new(SimulatedExecutor::new()));
        let job = service.create_job("sync", &Payload::new()).await.unwrap();

        let poller = Poller::start(service.clone(), Duration::from_millis(10));

        let mut status = JobStatus::Queued;
        for _ in 0..200 {
            status = service.get_job(job.id).await.unwrap().unwrap().status;
            if status == JobStatus::Succeeded {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(status, JobStatus::Succeeded);

        poller.shutdown(Duration::from_secs(2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_idle_wait() {
        let service = JobService::new(temp_pool().await, Arc::new(SimulatedExecutor::new()));
        let poller = Poller::start(service, Duration::from_secs(60));

        time::sleep(Duration::from_millis(50)).await;
        poller.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_fault_does_not_stop_loop() {
        let pool = temp_pool().await;
        let service = JobService::new(pool.clone(), Arc::new(SimulatedExecutor::new()));
        pool.close().await;

        let poller = Poller::start(service, Duration::from_millis(5));
        time::sleep(Duration::from_millis(100)).await;

        assert!(!poller.is_finished());
        poller.shutdown(Duration::from_secs(1)).await.unwrap();
    }
}
