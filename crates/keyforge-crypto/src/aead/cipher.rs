//! Stream cipher selection by nonce size

use chacha20::{
    ChaCha20, ChaCha20Legacy, Key, LegacyNonce, Nonce, XChaCha20, XNonce,
    cipher::{KeyIvInit, StreamCipher, StreamCipherError},
};

use super::KEY_SIZE;
use crate::error::CryptoError;

/// Bytes of keystream available after the one-time key block.
///
/// The block counter is 32 bits wide; one block is spent on the one-time
/// key and one is held back so the counter never wraps. Applied to every
/// nonce size.
pub(crate) const MAX_CIPHER_BYTES: u64 = (u32::MAX as u64 - 1) * 64;

/// ChaCha20 keystream for one AEAD session.
pub(crate) enum Keystream {
    /// 96-bit nonce (RFC 8439)
    Ietf(ChaCha20),
    /// 64-bit nonce (original Bernstein variant)
    Legacy(ChaCha20Legacy),
    /// 192-bit nonce (HChaCha20 subkey)
    Extended(XChaCha20),
}

impl Keystream {
    pub(crate) fn new(key: &[u8; KEY_SIZE], nonce: &[u8]) -> Result<Self, CryptoError> {
        let key = Key::from_slice(key);
        match nonce.len() {
            12 => Ok(Self::Ietf(ChaCha20::new(key, Nonce::from_slice(nonce)))),
            8 => Ok(Self::Legacy(ChaCha20Legacy::new(key, LegacyNonce::from_slice(nonce)))),
            24 => Ok(Self::Extended(XChaCha20::new(key, XNonce::from_slice(nonce)))),
            actual => Err(CryptoError::InvalidNonceLength { actual }),
        }
    }

    /// XOR the next `buf.len()` keystream bytes into `buf`.
    pub(crate) fn apply(&mut self, buf: &mut [u8]) -> Result<(), StreamCipherError> {
        match self {
            Self::Ietf(cipher) => cipher.try_apply_keystream(buf),
            Self::Legacy(cipher) => cipher.try_apply_keystream(buf),
            Self::Extended(cipher) => cipher.try_apply_keystream(buf),
        }
    }
}
