//! Error types for synchronous crypto operations

use thiserror::Error;

/// Broad classification of a [`CryptoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied malformed input. Nothing was mutated.
    Validation,
    /// Operation called in a state that does not permit it. Indicates a bug
    /// in the caller; the state is left untouched and may be reset.
    Misuse,
    /// The operation itself could not produce a result.
    Execution,
}

/// Errors from digest and AEAD operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input buffer has the wrong length
    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Which input was rejected
        what: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Nonce is not one of the supported sizes (8, 12 or 24 bytes)
    #[error("invalid nonce length: {actual} (expected 8, 12 or 24)")]
    InvalidNonceLength {
        /// Length that was supplied
        actual: usize,
    },

    /// Operation is not legal in the current state
    #[error("misuse: cannot {operation} in state {state}")]
    Misuse {
        /// Operation that was attempted
        operation: &'static str,
        /// State the object was in
        state: &'static str,
    },

    /// Processing this input would run past the end of the keystream
    #[error("keystream exhausted: {processed} bytes processed, {requested} more requested")]
    KeystreamExhausted {
        /// Bytes already processed by the cipher
        processed: u64,
        /// Bytes in the rejected request
        requested: usize,
    },

    /// Authentication tag did not match
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl CryptoError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength { .. } | Self::InvalidNonceLength { .. } => ErrorKind::Validation,
            Self::Misuse { .. } => ErrorKind::Misuse,
            Self::KeystreamExhausted { .. } | Self::AuthenticationFailed => ErrorKind::Execution,
        }
    }

    /// Returns true if this error reports a caller bug rather than bad data.
    pub fn is_misuse(&self) -> bool {
        self.kind() == ErrorKind::Misuse
    }
}
