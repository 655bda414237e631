//! ChaCha20-Poly1305 AEAD
//!
//! [`AeadState`] is the streaming state machine; [`seal`] and [`open`] wrap
//! it for whole messages. The construction follows RFC 8439 section 2.8:
//!
//! 1. Keystream block 0 is encrypted over 64 zero bytes; the first 32 bytes
//!    key Poly1305 (the one-time key).
//! 2. Associated data is authenticated, then zero-padded to 16 bytes.
//! 3. Ciphertext is produced from keystream block 1 onwards, authenticated,
//!    then zero-padded to 16 bytes.
//! 4. `le64(adlen) || le64(ctlen)` is authenticated and the Poly1305 output
//!    is the tag.
//!
//! Nonces of 12 bytes select IETF ChaCha20, 8 bytes the original 64-bit
//! nonce variant, and 24 bytes XChaCha20.

mod cipher;
mod mac;
pub mod seal;
pub mod state;

pub use seal::{SealedMessage, open, seal};
pub use state::{AeadMode, AeadState, verify_tag};

/// Key size in bytes
pub const KEY_SIZE: usize = 32;

/// Authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Poly1305 authentication tag
pub type Tag = [u8; TAG_SIZE];
