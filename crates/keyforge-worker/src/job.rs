//! Unit of background work

use std::fmt;

use crate::error::{ExecutionError, SubmitError};

/// Operation family of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Password-based key derivation
    DeriveKey,
    /// Key-pair generation
    GenerateKeyPair,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeriveKey => write!(f, "derive-key"),
            Self::GenerateKeyPair => write!(f, "generate-key-pair"),
        }
    }
}

/// Identifier assigned to an accepted job, unique per [`crate::Executor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// A heavy operation that can be moved to a background thread.
///
/// The job owns all of its inputs. [`validate`](Self::validate) runs on the
/// submitting thread; [`execute`](Self::execute) runs exactly once on a
/// blocking worker thread and consumes the job.
pub trait CryptoJob: Send + 'static {
    /// Value produced on success, moved to the caller on delivery
    type Output: Send + 'static;

    /// Operation family, for logging
    const KIND: JobKind;

    /// Check parameters without doing any cryptographic work.
    ///
    /// # Errors
    ///
    /// - `SubmitError::InvalidParameter` for out-of-range parameters
    fn validate(&self) -> Result<(), SubmitError>;

    /// Run the operation to completion.
    ///
    /// # Errors
    ///
    /// Any failure of the operation itself. Never partial output.
    fn execute(self) -> Result<Self::Output, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_display() {
        assert_eq!(JobId(7).to_string(), "job-7");
    }

    #[test]
    fn job_kind_display() {
        assert_eq!(JobKind::DeriveKey.to_string(), "derive-key");
        assert_eq!(JobKind::GenerateKeyPair.to_string(), "generate-key-pair");
    }
}
