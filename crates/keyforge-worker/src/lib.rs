//! Keyforge Background Execution
//!
//! Runs CPU-heavy operations (PBKDF2 key derivation, RSA key-pair
//! generation) off the caller's thread and hands exactly one outcome back.
//!
//! # Job Lifecycle
//!
//! ```text
//! caller                      Executor                    blocking pool
//!   │  submit(job)               │                             │
//!   │──────────────────────────> │ validate() (sync)           │
//!   │ <── Err(SubmitError) ──────│ on bad parameters           │
//!   │ <── JobHandle ─────────────│ spawn                       │
//!   │                            │── acquire slot ──────────>  │
//!   │                            │                             │ execute()
//!   │ <════ oneshot: Ok(output) | Err(ExecutionError) ═════════│
//! ```
//!
//! Jobs take their input buffers by value, so nothing the caller holds is
//! read from another thread. Outputs are moved back through a oneshot
//! channel and owned by the caller once the handle resolves.
//!
//! # Guarantees
//!
//! - Invalid parameters fail in [`Executor::submit`], before any thread is
//!   involved.
//! - Every accepted job resolves its [`JobHandle`] exactly once: with the
//!   output, with an [`ExecutionError`], or with
//!   [`ExecutionError::Abandoned`] if the runtime tore the job down.
//! - At most [`ExecutorConfig::max_jobs`] jobs execute concurrently.
//! - No ordering between completions of different jobs.
//! - No cancellation: an accepted job runs to completion or failure.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod executor;
pub mod handle;
pub mod job;
pub mod kdf;
pub mod keygen;

pub use error::{ExecutionError, SetupError, SubmitError};
pub use executor::{Executor, ExecutorConfig};
pub use handle::JobHandle;
pub use job::{CryptoJob, JobId, JobKind};
pub use kdf::{DerivedKey, KdfDigest, MAX_DERIVED_KEY_LEN, Pbkdf2Job};
pub use keygen::{RSA_MAX_BITS, RSA_MIN_BITS, RsaKeyGenJob, RsaKeyPair};
