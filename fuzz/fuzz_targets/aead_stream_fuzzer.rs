//! Fuzz target for the streaming AEAD state machine
//!
//! Drives `AeadState` with arbitrary call sequences and chunkings.
//!
//! # Strategy
//!
//! - All supported nonce sizes plus arbitrary invalid ones
//! - Associated data and payload split at arbitrary points
//! - Out-of-order calls (aad after payload, mode switches, use after
//!   finalize)
//!
//! # Invariants
//!
//! - No call panics; illegal calls return `Misuse` and leave the mode
//!   unchanged
//! - Chunked encryption produces the same bytes and tag as `seal`
//! - Chunked decryption of the result recovers the plaintext and the tag
//! - `open` accepts the tag and rejects any single-bit change to it
//! - Length counters never include padding

#![no_main]

use arbitrary::Arbitrary;
use keyforge_crypto::{AeadMode, AeadState, CryptoError, open, seal};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum NonceChoice {
    Legacy([u8; 8]),
    Ietf([u8; 12]),
    Extended([u8; 24]),
    Other(Vec<u8>),
}

impl NonceChoice {
    fn as_bytes(&self) -> &[u8] {
        match self {
            NonceChoice::Legacy(n) => n,
            NonceChoice::Ietf(n) => n,
            NonceChoice::Extended(n) => n,
            NonceChoice::Other(n) => n,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Call {
    Aad(Vec<u8>),
    Encrypt(Vec<u8>),
    Decrypt(Vec<u8>),
    Auth(Vec<u8>),
    Finalize,
    Init,
}

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    key: [u8; 32],
    nonce: NonceChoice,
    aad: Vec<u8>,
    plaintext: Vec<u8>,
    /// Chunk sizes used to split aad and plaintext
    splits: Vec<u8>,
    /// Free-form call sequence checked against the state machine rules
    calls: Vec<Call>,
    flip_bit: u8,
}

fn chunks<'a>(data: &'a [u8], splits: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut rest = data;
    for &size in splits.iter().cycle().take(data.len() + 1) {
        if rest.is_empty() {
            break;
        }
        let size = usize::from(size).clamp(1, rest.len());
        let (head, tail) = rest.split_at(size);
        out.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

fuzz_target!(|scenario: Scenario| {
    let nonce = scenario.nonce.as_bytes();

    let Ok(mut state) = AeadState::new(&scenario.key, nonce) else {
        // INVARIANT: only 8, 12 and 24-byte nonces are accepted
        assert!(![8, 12, 24].contains(&nonce.len()));
        assert!(matches!(
            seal(&scenario.key, nonce, &scenario.aad, &scenario.plaintext),
            Err(CryptoError::InvalidNonceLength { .. })
        ));
        return;
    };

    // INVARIANT: chunked encryption matches one-shot seal
    for chunk in chunks(&scenario.aad, &scenario.splits) {
        state.aad(chunk).unwrap();
    }
    let mut ciphertext = Vec::with_capacity(scenario.plaintext.len());
    for chunk in chunks(&scenario.plaintext, &scenario.splits) {
        ciphertext.extend(state.encrypt(chunk).unwrap());
    }
    assert_eq!(state.ad_len(), scenario.aad.len() as u64);
    assert_eq!(state.ct_len(), scenario.plaintext.len() as u64);
    let tag = state.finalize().unwrap();

    let sealed = seal(&scenario.key, nonce, &scenario.aad, &scenario.plaintext).unwrap();
    assert_eq!(sealed.ciphertext, ciphertext);
    assert_eq!(sealed.tag, tag);

    // INVARIANT: chunked decryption recovers plaintext and the same tag
    state.init(&scenario.key, nonce).unwrap();
    state.aad(&scenario.aad).unwrap();
    let mut recovered = Vec::with_capacity(ciphertext.len());
    for chunk in chunks(&ciphertext, &scenario.splits) {
        recovered.extend(state.decrypt(chunk).unwrap());
    }
    assert_eq!(recovered, scenario.plaintext);
    assert_eq!(state.finalize().unwrap(), tag);

    // INVARIANT: open accepts the tag and rejects any flipped bit
    let opened = open(&scenario.key, nonce, &scenario.aad, &ciphertext, &tag).unwrap();
    assert_eq!(opened, scenario.plaintext);

    let mut bad_tag = tag;
    bad_tag[usize::from(scenario.flip_bit % 16)] ^= 1 << (scenario.flip_bit % 8);
    assert_eq!(
        open(&scenario.key, nonce, &scenario.aad, &ciphertext, &bad_tag),
        Err(CryptoError::AuthenticationFailed)
    );

    // INVARIANT: arbitrary call sequences never panic, misuse leaves mode unchanged
    state.init(&scenario.key, nonce).unwrap();
    for call in scenario.calls {
        let before = state.mode();
        let result = match call {
            Call::Aad(data) => state.aad(&data),
            Call::Encrypt(data) => state.encrypt(&data).map(drop),
            Call::Decrypt(data) => state.decrypt(&data).map(drop),
            Call::Auth(data) => state.auth(&data),
            Call::Finalize => state.finalize().map(drop),
            Call::Init => state.init(&scenario.key, nonce),
        };

        match result {
            Ok(()) => {},
            Err(e) => {
                assert!(e.is_misuse(), "unexpected error: {e}");
                assert_eq!(state.mode(), before);
            },
        }

        if state.mode() == AeadMode::Finalized {
            assert!(state.aad(b"late").unwrap_err().is_misuse());
        }
    }
});
