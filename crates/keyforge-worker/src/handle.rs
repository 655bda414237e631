//! Single-delivery completion handle

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::{
    error::ExecutionError,
    job::{JobId, JobKind},
};

pub(crate) type Outcome<T> = Result<T, ExecutionError>;

/// Receiving end of one submitted job.
///
/// Resolves exactly once with the job's output or its failure. Three ways
/// to collect it, depending on the caller's thread:
///
/// - `.await` from async code
/// - [`blocking_wait`](Self::blocking_wait) from a plain thread
/// - [`try_take`](Self::try_take) from an event loop that polls
///
/// Dropping the handle does not cancel the job; its output is discarded.
#[derive(Debug)]
pub struct JobHandle<T> {
    id: JobId,
    kind: JobKind,
    receiver: oneshot::Receiver<Outcome<T>>,
    delivered: bool,
}

impl<T> JobHandle<T> {
    pub(crate) fn new(id: JobId, kind: JobKind, receiver: oneshot::Receiver<Outcome<T>>) -> Self {
        Self { id, kind, receiver, delivered: false }
    }

    /// Identifier assigned at submission.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Operation family.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Block the current thread until the job completes.
    ///
    /// Must not be called from within an async runtime thread.
    ///
    /// # Errors
    ///
    /// The job's [`ExecutionError`], or `Abandoned` if it never completed.
    pub fn blocking_wait(self) -> Outcome<T> {
        self.receiver.blocking_recv().unwrap_or(Err(ExecutionError::Abandoned))
    }

    /// Take the outcome if the job has finished.
    ///
    /// Returns `None` while the job is running and after the outcome has
    /// been taken once.
    pub fn try_take(&mut self) -> Option<Outcome<T>> {
        if self.delivered {
            return None;
        }

        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(ExecutionError::Abandoned),
        };
        self.delivered = true;
        Some(outcome)
    }
}

impl<T> Future for JobHandle<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let poll = Pin::new(&mut self.receiver).poll(cx);
        poll.map(|received| {
            self.delivered = true;
            received.unwrap_or(Err(ExecutionError::Abandoned))
        })
    }
}
