//! PBKDF2 key derivation job

use std::fmt;

use hmac::Hmac;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use crate::{
    error::{ExecutionError, SubmitError},
    job::{CryptoJob, JobKind},
};

/// Largest derived key a job may request (1 MiB).
pub const MAX_DERIVED_KEY_LEN: usize = 1 << 20;

/// PRF digest for PBKDF2 (HMAC over the selected hash)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfDigest {
    /// HMAC-SHA-256
    Sha256,
    /// HMAC-SHA-512
    Sha512,
}

impl KdfDigest {
    /// Algorithm name
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

/// Key material produced by a derivation job. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Zeroizing<Vec<u8>>);

impl DerivedKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for keys produced by [`Pbkdf2Job`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey").field("len", &self.0.len()).finish_non_exhaustive()
    }
}

/// PBKDF2 derivation of `key_len` bytes from a password and salt.
///
/// Inputs are moved into the job; the password is wiped when the job is
/// dropped.
pub struct Pbkdf2Job {
    digest: KdfDigest,
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
    iterations: u32,
    key_len: usize,
}

impl Pbkdf2Job {
    /// Build a derivation job. Parameters are checked at submission.
    pub fn new(
        digest: KdfDigest,
        password: Vec<u8>,
        salt: Vec<u8>,
        iterations: u32,
        key_len: usize,
    ) -> Self {
        Self { digest, password: Zeroizing::new(password), salt, iterations, key_len }
    }

    /// Requested output length in bytes.
    pub fn key_len(&self) -> usize {
        self.key_len
    }

    /// Iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl fmt::Debug for Pbkdf2Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pbkdf2Job")
            .field("digest", &self.digest)
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .field("key_len", &self.key_len)
            .finish_non_exhaustive()
    }
}

impl CryptoJob for Pbkdf2Job {
    type Output = DerivedKey;

    const KIND: JobKind = JobKind::DeriveKey;

    fn validate(&self) -> Result<(), SubmitError> {
        if self.iterations == 0 {
            return Err(SubmitError::InvalidParameter {
                parameter: "iterations",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.key_len > MAX_DERIVED_KEY_LEN {
            return Err(SubmitError::InvalidParameter {
                parameter: "key length",
                reason: format!("{} exceeds maximum {MAX_DERIVED_KEY_LEN}", self.key_len),
            });
        }

        Ok(())
    }

    fn execute(self) -> Result<DerivedKey, ExecutionError> {
        if self.key_len == 0 {
            return Err(ExecutionError::InvalidKeyLength { requested: 0 });
        }

        let mut key = Zeroizing::new(vec![0u8; self.key_len]);
        let (password, salt, rounds) = (&self.password[..], &self.salt[..], self.iterations);
        let result = match self.digest {
            KdfDigest::Sha256 => pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, &mut key),
            KdfDigest::Sha512 => pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, rounds, &mut key),
        };

        result.map_err(|e| ExecutionError::Derivation {
            reason: format!("PBKDF2-HMAC-{} failed: {e}", self.digest.name()),
        })?;

        Ok(DerivedKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(digest: KdfDigest, iterations: u32, key_len: usize) -> Pbkdf2Job {
        Pbkdf2Job::new(digest, b"password".to_vec(), b"salt".to_vec(), iterations, key_len)
    }

    #[test]
    fn sha256_single_iteration_vector() {
        let key = job(KdfDigest::Sha256, 1, 32).execute().unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn sha512_single_iteration_vector() {
        let key = job(KdfDigest::Sha512, 1, 32).execute().unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252"
        );
    }

    #[test]
    fn sha256_many_iterations_vector() {
        let key = job(KdfDigest::Sha256, 4096, 32).execute().unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn output_has_requested_length() {
        let key = job(KdfDigest::Sha512, 2, 100).execute().unwrap();
        assert_eq!(key.len(), 100);
        assert!(!key.is_empty());
    }

    #[test]
    fn zero_length_fails_at_execution() {
        let job = job(KdfDigest::Sha256, 1, 0);
        assert!(job.validate().is_ok());
        assert_eq!(job.execute(), Err(ExecutionError::InvalidKeyLength { requested: 0 }));
    }

    #[test]
    fn zero_iterations_rejected_at_validation() {
        let result = job(KdfDigest::Sha256, 0, 32).validate();
        assert!(matches!(
            result,
            Err(SubmitError::InvalidParameter { parameter: "iterations", .. })
        ));
    }

    #[test]
    fn oversized_key_rejected_at_validation() {
        let result = job(KdfDigest::Sha256, 1, MAX_DERIVED_KEY_LEN + 1).validate();
        assert!(matches!(
            result,
            Err(SubmitError::InvalidParameter { parameter: "key length", .. })
        ));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", job(KdfDigest::Sha256, 1, 32));
        assert!(!rendered.contains("password"));

        let key = job(KdfDigest::Sha256, 1, 32).execute().unwrap();
        assert_eq!(format!("{key:?}"), "DerivedKey { len: 32, .. }");
    }
}
