//! Keyforge Cryptographic Engine
//!
//! Synchronous building blocks for keyforge: streaming digests with
//! Merkle-style composition helpers, and a single-pass ChaCha20-Poly1305
//! AEAD state machine with byte-exact framing. Everything here runs on the
//! calling thread and holds no global state. Heavy operations (key
//! derivation, key-pair generation) live in `keyforge-worker`.
//!
//! # Digests
//!
//! ```text
//! DigestState<H>::new()
//!        │
//!        ▼ update(data)*        (Absorbing)
//!        │
//!        ▼ finalize()           (Finalized, reset() to reuse)
//! H::Output
//! ```
//!
//! One-shot helpers ([`digest()`], [`root`], [`multi`], [`fingerprint`]) are
//! built on the same incremental path and produce identical bytes.
//!
//! # AEAD
//!
//! ```text
//!            ┌──────────── aad()* ────────────┐
//!            ▼                                │
//!         ┌──────┐ encrypt()  ┌─────────┐     │
//!         │ Init │───────────>│ Encrypt │──┐  │
//!         └──────┘ decrypt()  ├─────────┤  │  │
//!            │    ───────────>│ Decrypt │──┤  │
//!            │     auth()     ├─────────┤  │ finalize()
//!            │    ───────────>│AuthOnly │──┤
//!            │                └─────────┘  ▼
//!            └──────── finalize() ──────> Finalized
//! ```
//!
//! The Poly1305 input is `aad || pad16 || ciphertext || pad16 || le64(adlen)
//! || le64(ctlen)`, matching RFC 8439 section 2.8. Padding is never counted
//! in the length footer.
//!
//! # Errors
//!
//! Every fallible operation returns [`CryptoError`]. Callers distinguish
//! bad input ([`ErrorKind::Validation`]), calls made in the wrong state
//! ([`ErrorKind::Misuse`], a bug in the caller) and failures of the
//! operation itself ([`ErrorKind::Execution`]). State is never partially
//! mutated by a rejected call.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod digest;
pub mod error;

pub use aead::{
    AeadMode, AeadState, KEY_SIZE, SealedMessage, TAG_SIZE, Tag, open, seal, verify_tag,
};
pub use digest::{
    DigestPhase, DigestState, FINGERPRINT_SIZE, Hash160, HashAlgorithm, Sha256, Sha512, digest,
    fingerprint, multi, root,
};
pub use error::{CryptoError, ErrorKind};
