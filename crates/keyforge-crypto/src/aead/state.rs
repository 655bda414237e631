//! Streaming AEAD state machine

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{
    KEY_SIZE, Tag,
    cipher::{Keystream, MAX_CIPHER_BYTES},
    mac::MacAccumulator,
};
use crate::error::CryptoError;

/// AEAD session mode.
///
/// Transitions only move forward:
/// `Init -> {Encrypt | Decrypt | AuthOnly} -> Finalized`, or
/// `Init -> Finalized` when no payload was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadMode {
    /// Keyed; accepting associated data
    Init,
    /// Encrypting payload
    Encrypt,
    /// Decrypting payload
    Decrypt,
    /// Authenticating payload without encryption
    AuthOnly,
    /// Tag emitted; only [`AeadState::init`] is legal
    Finalized,
}

impl AeadMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::AuthOnly => "auth-only",
            Self::Finalized => "finalized",
        }
    }
}

/// Keyed primitives for one session. Dropped at finalization.
struct Session {
    keystream: Keystream,
    mac: MacAccumulator,
}

/// ChaCha20-Poly1305 session.
///
/// Single owner, driven from one thread. A rejected call never changes the
/// state: misuse and validation errors are reported before anything is fed
/// to the cipher or the authenticator.
pub struct AeadState {
    mode: AeadMode,
    /// `None` once finalized
    session: Option<Session>,
    /// Associated-data bytes authenticated (padding excluded)
    ad_len: u64,
    /// Payload bytes authenticated (padding excluded)
    ct_len: u64,
}

impl AeadState {
    /// Start a session for `key` and `nonce`.
    ///
    /// Derives the one-time Poly1305 key from keystream block 0; the
    /// remaining keystream starts at block 1.
    ///
    /// # Errors
    ///
    /// - `InvalidNonceLength` unless the nonce is 8, 12 or 24 bytes
    pub fn new(key: &[u8; KEY_SIZE], nonce: &[u8]) -> Result<Self, CryptoError> {
        let mut keystream = Keystream::new(key, nonce)?;

        let mut block = Zeroizing::new([0u8; 64]);
        keystream.apply(&mut block[..]).map_err(|_| CryptoError::KeystreamExhausted {
            processed: 0,
            requested: 64,
        })?;

        let mut one_time_key = Zeroizing::new([0u8; 32]);
        one_time_key.copy_from_slice(&block[..32]);
        let mac = MacAccumulator::new(&one_time_key);

        Ok(Self {
            mode: AeadMode::Init,
            session: Some(Session { keystream, mac }),
            ad_len: 0,
            ct_len: 0,
        })
    }

    /// Re-key this state, discarding the current session in any mode.
    ///
    /// # Errors
    ///
    /// - `InvalidNonceLength` unless the nonce is 8, 12 or 24 bytes. The
    ///   existing session is kept in that case.
    pub fn init(&mut self, key: &[u8; KEY_SIZE], nonce: &[u8]) -> Result<(), CryptoError> {
        *self = Self::new(key, nonce)?;
        Ok(())
    }

    /// Current mode.
    pub fn mode(&self) -> AeadMode {
        self.mode
    }

    /// Associated-data bytes processed so far.
    pub fn ad_len(&self) -> u64 {
        self.ad_len
    }

    /// Payload bytes processed so far.
    pub fn ct_len(&self) -> u64 {
        self.ct_len
    }

    /// Authenticate associated data.
    ///
    /// # Errors
    ///
    /// - `Misuse` once any payload operation has started or after
    ///   finalization
    pub fn aad(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        if self.mode != AeadMode::Init {
            return Err(self.misuse("aad"));
        }
        let session = self.session_mut("aad")?;
        session.mac.update(data);
        self.ad_len += data.len() as u64;
        Ok(())
    }

    /// Encrypt `buf` in place and authenticate the ciphertext.
    ///
    /// # Errors
    ///
    /// - `Misuse` if the session is decrypting, authenticating only, or
    ///   finalized
    /// - `KeystreamExhausted` if the keystream cannot cover `buf`
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let processed = self.ct_len;
        let session = self.begin_payload(AeadMode::Encrypt, "encrypt", buf.len())?;
        session
            .keystream
            .apply(buf)
            .map_err(|_| CryptoError::KeystreamExhausted { processed, requested: buf.len() })?;
        session.mac.update(buf);
        Ok(())
    }

    /// Encrypt `input`, returning the ciphertext.
    ///
    /// # Errors
    ///
    /// Same as [`encrypt_in_place`](Self::encrypt_in_place).
    pub fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut output = input.to_vec();
        self.encrypt_in_place(&mut output)?;
        Ok(output)
    }

    /// Authenticate the ciphertext in `buf`, then decrypt it in place.
    ///
    /// The plaintext is unauthenticated until [`finalize`](Self::finalize)
    /// produces a tag that passes [`verify_tag`].
    ///
    /// # Errors
    ///
    /// - `Misuse` if the session is encrypting, authenticating only, or
    ///   finalized
    /// - `KeystreamExhausted` if the keystream cannot cover `buf`
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let processed = self.ct_len;
        let session = self.begin_payload(AeadMode::Decrypt, "decrypt", buf.len())?;
        session.mac.update(buf);
        session
            .keystream
            .apply(buf)
            .map_err(|_| CryptoError::KeystreamExhausted { processed, requested: buf.len() })
    }

    /// Decrypt `input`, returning the plaintext.
    ///
    /// # Errors
    ///
    /// Same as [`decrypt_in_place`](Self::decrypt_in_place).
    pub fn decrypt(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut output = input.to_vec();
        self.decrypt_in_place(&mut output)?;
        Ok(output)
    }

    /// Authenticate `data` as payload without encrypting it.
    ///
    /// # Errors
    ///
    /// - `Misuse` if the session is encrypting, decrypting, or finalized
    pub fn auth(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        let session = self.begin_payload(AeadMode::AuthOnly, "auth", data.len())?;
        session.mac.update(data);
        Ok(())
    }

    /// Pad, authenticate the length footer and emit the tag.
    ///
    /// Works from `Init` too (associated data only). The session keys are
    /// dropped; the state must be re-keyed with [`init`](Self::init) before
    /// reuse.
    ///
    /// # Errors
    ///
    /// - `Misuse` if already finalized
    pub fn finalize(&mut self) -> Result<Tag, CryptoError> {
        if self.mode == AeadMode::Finalized {
            return Err(self.misuse("finalize"));
        }
        let Some(mut session) = self.session.take() else {
            return Err(self.misuse("finalize"));
        };

        let mut footer = [0u8; 16];
        footer[..8].copy_from_slice(&self.ad_len.to_le_bytes());
        footer[8..].copy_from_slice(&self.ct_len.to_le_bytes());

        // Only one of the two streams can have a partial block pending
        session.mac.pad();
        session.mac.update(&footer);

        self.mode = AeadMode::Finalized;
        Ok(session.mac.finalize())
    }

    /// Check the transition into `target`, then perform it.
    ///
    /// On the first payload call the associated data is padded to the block
    /// boundary and the mode switches. All checks run before any mutation.
    fn begin_payload(
        &mut self,
        target: AeadMode,
        operation: &'static str,
        len: usize,
    ) -> Result<&mut Session, CryptoError> {
        if self.mode != AeadMode::Init && self.mode != target {
            return Err(self.misuse(operation));
        }

        let len = len as u64;
        if target != AeadMode::AuthOnly && self.ct_len.saturating_add(len) > MAX_CIPHER_BYTES {
            return Err(CryptoError::KeystreamExhausted {
                processed: self.ct_len,
                requested: len as usize,
            });
        }

        let switching = self.mode == AeadMode::Init;
        let Some(session) = self.session.as_mut() else {
            return Err(CryptoError::Misuse { operation, state: self.mode.as_str() });
        };

        if switching {
            session.mac.pad();
            self.mode = target;
        }
        self.ct_len += len;
        Ok(session)
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut Session, CryptoError> {
        let state = self.mode.as_str();
        self.session.as_mut().ok_or(CryptoError::Misuse { operation, state })
    }

    fn misuse(&self, operation: &'static str) -> CryptoError {
        CryptoError::Misuse { operation, state: self.mode.as_str() }
    }
}

impl fmt::Debug for AeadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadState")
            .field("mode", &self.mode)
            .field("ad_len", &self.ad_len)
            .field("ct_len", &self.ct_len)
            .finish_non_exhaustive()
    }
}

/// Compare two tags in constant time.
///
/// Running time depends only on the lengths, never on where the first
/// differing byte is. Tags of different lengths never match.
pub fn verify_tag(expected: &[u8], actual: &[u8]) -> bool {
    expected.ct_eq(actual).into()
}
