//! Error types for job submission and execution

use thiserror::Error;

/// Synchronous rejection from [`crate::Executor::submit`].
///
/// Raised on the calling thread before the job reaches the background.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A job parameter is out of range
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter
        parameter: &'static str,
        /// Why it was rejected
        reason: String,
    },

}

/// Failure to construct an [`crate::Executor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// No tokio runtime is available to run jobs on
    #[error("no async runtime available")]
    NoRuntime,

    /// `max_jobs` must allow at least one running job
    #[error("invalid executor config: max_jobs must be at least 1")]
    ZeroMaxJobs,
}

/// Failure of an accepted job, delivered through its [`crate::JobHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Requested derived-key length cannot be produced
    #[error("invalid derived key length: {requested}")]
    InvalidKeyLength {
        /// Length that was requested
        requested: usize,
    },

    /// Key derivation primitive failed
    #[error("key derivation failed: {reason}")]
    Derivation {
        /// Failure reported by the primitive
        reason: String,
    },

    /// Key-pair generation failed (e.g. no suitable primes found)
    #[error("key generation failed: {reason}")]
    KeyGeneration {
        /// Failure reported by the primitive
        reason: String,
    },

    /// The job panicked on its worker thread
    #[error("job panicked: {reason}")]
    Panicked {
        /// Panic description from the runtime
        reason: String,
    },

    /// The job was torn down before producing an outcome
    #[error("job abandoned before completion")]
    Abandoned,
}

impl ExecutionError {
    /// Returns true if resubmitting the same job may succeed.
    ///
    /// Key generation is randomized and a runtime shutdown is external;
    /// everything else fails the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::KeyGeneration { .. } | Self::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_and_abandonment_are_transient() {
        let err = ExecutionError::KeyGeneration { reason: "prime search".to_string() };
        assert!(err.is_transient());
        assert!(ExecutionError::Abandoned.is_transient());
    }

    #[test]
    fn deterministic_failures_are_not_transient() {
        assert!(!ExecutionError::InvalidKeyLength { requested: 0 }.is_transient());
        assert!(!ExecutionError::Derivation { reason: "x".to_string() }.is_transient());
        assert!(!ExecutionError::Panicked { reason: "x".to_string() }.is_transient());
    }

    #[test]
    fn error_display() {
        let err = SubmitError::InvalidParameter {
            parameter: "iterations",
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(err.to_string(), "invalid iterations: must be at least 1");

        let err = ExecutionError::InvalidKeyLength { requested: 0 };
        assert_eq!(err.to_string(), "invalid derived key length: 0");

        assert_eq!(
            SetupError::ZeroMaxJobs.to_string(),
            "invalid executor config: max_jobs must be at least 1"
        );
    }
}
