//! Bounded background executor
//!
//! Jobs are spawned onto a tokio runtime and run on its blocking pool. A
//! semaphore caps how many execute at once; the rest wait for a slot with no
//! ordering between waiting jobs, since each job's task only queues for a
//! slot once the runtime first polls it. Each job's outcome goes back
//! through its own oneshot channel, so completions never wait on each other.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use tokio::{
    runtime::Handle,
    sync::{Semaphore, oneshot},
};

use crate::{
    error::{ExecutionError, SetupError, SubmitError},
    handle::{JobHandle, Outcome},
    job::{CryptoJob, JobId},
};

/// Concurrency used when the host cannot report its parallelism.
const FALLBACK_MAX_JOBS: usize = 4;

/// Executor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of jobs executing at the same time. Must be non-zero.
    pub max_jobs: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        let max_jobs =
            std::thread::available_parallelism().map_or(FALLBACK_MAX_JOBS, NonZeroUsize::get);
        Self { max_jobs }
    }
}

/// Runs [`CryptoJob`]s off the calling thread.
///
/// Cheap to clone; clones share the concurrency limit and id sequence.
#[derive(Debug, Clone)]
pub struct Executor {
    runtime: Handle,
    permits: Arc<Semaphore>,
    next_id: Arc<AtomicU64>,
    config: ExecutorConfig,
}

impl Executor {
    /// Create an executor that spawns onto `runtime`.
    ///
    /// # Errors
    ///
    /// - `SetupError::ZeroMaxJobs` if `max_jobs` is zero
    pub fn new(runtime: Handle, config: ExecutorConfig) -> Result<Self, SetupError> {
        if config.max_jobs == 0 {
            return Err(SetupError::ZeroMaxJobs);
        }

        Ok(Self {
            runtime,
            permits: Arc::new(Semaphore::new(config.max_jobs)),
            next_id: Arc::new(AtomicU64::new(1)),
            config,
        })
    }

    /// Create an executor on the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// - `SetupError::NoRuntime` when called outside a tokio runtime
    /// - `SetupError::ZeroMaxJobs` if `max_jobs` is zero
    pub fn current(config: ExecutorConfig) -> Result<Self, SetupError> {
        let runtime = Handle::try_current().map_err(|_| SetupError::NoRuntime)?;
        Self::new(runtime, config)
    }

    /// Active configuration.
    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Number of execution slots not currently held by a job.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    /// Validate `job` and schedule it for background execution.
    ///
    /// Returns as soon as the job is scheduled. The returned handle resolves
    /// exactly once.
    ///
    /// # Errors
    ///
    /// - `SubmitError::InvalidParameter` from the job's own validation; the
    ///   job is dropped and nothing is scheduled
    pub fn submit<J: CryptoJob>(&self, job: J) -> Result<JobHandle<J::Output>, SubmitError> {
        if let Err(e) = job.validate() {
            tracing::debug!(kind = %J::KIND, error = %e, "Job rejected");
            return Err(e);
        }

        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();

        tracing::debug!(job_id = %id, kind = %J::KIND, "Job submitted");
        self.runtime.spawn(run_job(id, job, Arc::clone(&self.permits), tx));

        Ok(JobHandle::new(id, J::KIND, rx))
    }
}

/// Wait for a slot, execute on the blocking pool, deliver the outcome.
///
/// The permit is held until `execute` returns, so the semaphore bounds
/// running jobs rather than scheduled ones.
#[allow(clippy::disallowed_methods, reason = "Wall-clock timing for logs only")]
async fn run_job<J: CryptoJob>(
    id: JobId,
    job: J,
    permits: Arc<Semaphore>,
    tx: oneshot::Sender<Outcome<J::Output>>,
) {
    let outcome = match permits.acquire_owned().await {
        Ok(permit) => {
            let started = Instant::now();
            let joined = tokio::task::spawn_blocking(move || {
                let outcome = job.execute();
                drop(permit);
                outcome
            })
            .await;

            let outcome = joined.unwrap_or_else(|e| {
                Err(if e.is_panic() {
                    ExecutionError::Panicked { reason: e.to_string() }
                } else {
                    ExecutionError::Abandoned
                })
            });

            match &outcome {
                Ok(_) => tracing::debug!(
                    job_id = %id,
                    kind = %J::KIND,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Job completed"
                ),
                Err(e) => tracing::warn!(job_id = %id, kind = %J::KIND, error = %e, "Job failed"),
            }
            outcome
        },
        Err(_) => Err(ExecutionError::Abandoned),
    };

    if tx.send(outcome).is_err() {
        tracing::debug!(job_id = %id, "Handle dropped before delivery, discarding outcome");
    }
}
