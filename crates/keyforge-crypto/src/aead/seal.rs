//! Whole-message encryption on top of [`AeadState`]

use zeroize::Zeroize;

use super::{
    KEY_SIZE, TAG_SIZE, Tag,
    state::{AeadState, verify_tag},
};
use crate::error::CryptoError;

/// Ciphertext with its detached authentication tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Encrypted payload, same length as the plaintext
    pub ciphertext: Vec<u8>,
    /// Poly1305 tag over associated data and ciphertext
    pub tag: Tag,
}

impl SealedMessage {
    /// Ciphertext followed by the tag, the common wire layout.
    pub fn to_combined(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.ciphertext.len() + TAG_SIZE);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }
}

/// Encrypt and authenticate `plaintext` in one call.
///
/// # Errors
///
/// - `InvalidNonceLength` unless the nonce is 8, 12 or 24 bytes
/// - `KeystreamExhausted` if the message exceeds the keystream
pub fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<SealedMessage, CryptoError> {
    let mut state = AeadState::new(key, nonce)?;
    state.aad(aad)?;

    let mut ciphertext = plaintext.to_vec();
    state.encrypt_in_place(&mut ciphertext)?;
    let tag = state.finalize()?;

    Ok(SealedMessage { ciphertext, tag })
}

/// Verify and decrypt a sealed message.
///
/// Plaintext is only returned after the tag has been checked; on failure the
/// decrypted buffer is wiped before returning.
///
/// # Errors
///
/// - `InvalidLength` if `tag` is not 16 bytes
/// - `InvalidNonceLength` unless the nonce is 8, 12 or 24 bytes
/// - `AuthenticationFailed` if the tag does not match (tamper or wrong key)
pub fn open(
    key: &[u8; KEY_SIZE],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if tag.len() != TAG_SIZE {
        return Err(CryptoError::InvalidLength {
            what: "tag",
            expected: TAG_SIZE,
            actual: tag.len(),
        });
    }

    let mut state = AeadState::new(key, nonce)?;
    state.aad(aad)?;

    let mut plaintext = ciphertext.to_vec();
    state.decrypt_in_place(&mut plaintext)?;
    let computed = state.finalize()?;

    if !verify_tag(&computed, tag) {
        plaintext.zeroize();
        return Err(CryptoError::AuthenticationFailed);
    }

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const NONCE: [u8; 12] = [0x24; 12];

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal(&KEY, &NONCE, b"header", b"Hello, World!").unwrap();
        let opened = open(&KEY, &NONCE, b"header", &sealed.ciphertext, &sealed.tag).unwrap();

        assert_eq!(opened, b"Hello, World!");
    }

    #[test]
    fn seal_open_empty_message() {
        let sealed = seal(&KEY, &NONCE, b"", b"").unwrap();
        assert!(sealed.ciphertext.is_empty());

        let opened = open(&KEY, &NONCE, b"", &sealed.ciphertext, &sealed.tag).unwrap();
        assert!(opened.is_empty());
    }

    #[test]
    fn seal_open_large_message() {
        let plaintext = vec![0x42u8; 64 * 1024];
        let sealed = seal(&KEY, &NONCE, b"", &plaintext).unwrap();
        let opened = open(&KEY, &NONCE, b"", &sealed.ciphertext, &sealed.tag).unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let sealed = seal(&KEY, &NONCE, b"", b"test message").unwrap();
        assert_eq!(sealed.ciphertext.len(), 12);
        assert_eq!(sealed.to_combined().len(), 12 + TAG_SIZE);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut sealed = seal(&KEY, &NONCE, b"", b"original message").unwrap();
        sealed.ciphertext[0] ^= 0x01;

        let result = open(&KEY, &NONCE, b"", &sealed.ciphertext, &sealed.tag);
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_aad_fails() {
        let sealed = seal(&KEY, &NONCE, b"header", b"payload").unwrap();

        let result = open(&KEY, &NONCE, b"heades", &sealed.ciphertext, &sealed.tag);
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = seal(&KEY, &NONCE, b"", b"secret").unwrap();

        let mut wrong_key = KEY;
        wrong_key[31] ^= 0x80;
        let result = open(&wrong_key, &NONCE, b"", &sealed.ciphertext, &sealed.tag);
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn short_tag_is_validation_error() {
        let sealed = seal(&KEY, &NONCE, b"", b"secret").unwrap();

        let result = open(&KEY, &NONCE, b"", &sealed.ciphertext, &sealed.tag[..8]);
        assert_eq!(
            result,
            Err(CryptoError::InvalidLength { what: "tag", expected: TAG_SIZE, actual: 8 })
        );
    }

    #[test]
    fn different_nonces_produce_different_ciphertexts() {
        let a = seal(&KEY, &[0u8; 12], b"", b"test").unwrap();
        let b = seal(&KEY, &[1u8; 12], b"", b"test").unwrap();

        assert_ne!(a.ciphertext, b.ciphertext);
        assert_ne!(a.tag, b.tag);
    }

    #[test]
    fn all_nonce_sizes_roundtrip() {
        for nonce in [&[9u8; 8][..], &[9u8; 12][..], &[9u8; 24][..]] {
            let sealed = seal(&KEY, nonce, b"aad", b"payload").unwrap();
            let opened = open(&KEY, nonce, b"aad", &sealed.ciphertext, &sealed.tag).unwrap();
            assert_eq!(opened, b"payload");
        }
    }
}
