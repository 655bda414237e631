//! CLI error types.

use keyforge_crypto::CryptoError;
use keyforge_worker::{ExecutionError, SetupError, SubmitError};
use thiserror::Error;

/// Everything that can make a command fail.
#[derive(Debug, Error)]
pub enum CliError {
    /// An argument was not valid hex.
    #[error("{field} is not valid hex: {source}")]
    Hex {
        /// Argument name
        field: &'static str,
        /// Decoder failure
        source: hex::FromHexError,
    },

    /// Synchronous crypto failure (bad length, authentication).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Background executor could not be created.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Background job rejected at submission.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Background job failed while running.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Writing the result failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a hex argument, naming it in the error.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, CliError> {
    hex::decode(value).map_err(|source| CliError::Hex { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_hex() {
        assert_eq!(decode_hex("data", "00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert!(decode_hex("data", "").unwrap().is_empty());
    }

    #[test]
    fn decode_error_names_field() {
        let err = decode_hex("salt", "zz").unwrap_err();
        assert!(matches!(err, CliError::Hex { field: "salt", .. }));
        assert!(err.to_string().starts_with("salt is not valid hex"));
    }

    #[test]
    fn crypto_errors_pass_through() {
        let err = CliError::from(CryptoError::AuthenticationFailed);
        assert_eq!(err.to_string(), CryptoError::AuthenticationFailed.to_string());
    }
}
