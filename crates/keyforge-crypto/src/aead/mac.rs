//! Block-aligned Poly1305 accumulator

use poly1305::{
    Key, Poly1305,
    universal_hash::{KeyInit, UniversalHash},
};
use zeroize::Zeroizing;

use super::{TAG_SIZE, Tag};

/// Poly1305 block size in bytes
pub(crate) const BLOCK_SIZE: usize = 16;

/// Poly1305 fed with arbitrary-length chunks.
///
/// Poly1305 treats a short final block differently from a zero-padded one,
/// so partial input is held back until it either completes a block or
/// [`pad`](Self::pad) fills it with zeros. Every block reaching the
/// authenticator is therefore a full 16 bytes.
pub(crate) struct MacAccumulator {
    mac: Poly1305,
    pending: Zeroizing<[u8; BLOCK_SIZE]>,
    pending_len: usize,
}

impl MacAccumulator {
    /// Key the authenticator with a 32-byte one-time key.
    pub(crate) fn new(one_time_key: &[u8; 32]) -> Self {
        Self {
            mac: Poly1305::new(Key::from_slice(one_time_key)),
            pending: Zeroizing::new([0u8; BLOCK_SIZE]),
            pending_len: 0,
        }
    }

    pub(crate) fn update(&mut self, mut data: &[u8]) {
        if self.pending_len > 0 {
            let take = (BLOCK_SIZE - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];

            if self.pending_len < BLOCK_SIZE {
                return;
            }
            self.mac.update_padded(&self.pending[..]);
            self.pending_len = 0;
        }

        let whole = data.len() - data.len() % BLOCK_SIZE;
        if whole > 0 {
            // Multiple of the block size, so no padding is applied
            self.mac.update_padded(&data[..whole]);
        }

        let rest = &data[whole..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// Zero-fill the pending partial block, if any, and absorb it.
    pub(crate) fn pad(&mut self) {
        if self.pending_len == 0 {
            return;
        }
        self.pending[self.pending_len..].fill(0);
        self.mac.update_padded(&self.pending[..]);
        self.pending_len = 0;
    }

    pub(crate) fn finalize(mut self) -> Tag {
        self.pad();
        let output = self.mac.finalize();
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&output);
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded_reference(key: &[u8; 32], data: &[u8]) -> Tag {
        let mut mac = Poly1305::new(Key::from_slice(key));
        mac.update_padded(data);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&mac.finalize());
        tag
    }

    #[test]
    fn authenticator_key_wiped_on_drop() {
        fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<Poly1305>();
    }

    #[test]
    fn chunked_updates_match_single_padded_update() {
        let key = [9u8; 32];
        let data: Vec<u8> = (0..=200u8).collect();

        let mut acc = MacAccumulator::new(&key);
        for chunk in data.chunks(7) {
            acc.update(chunk);
        }

        assert_eq!(acc.finalize(), padded_reference(&key, &data));
    }

    #[test]
    fn pad_aligns_following_input() {
        let key = [3u8; 32];

        let mut acc = MacAccumulator::new(&key);
        acc.update(b"abc");
        acc.pad();
        acc.update(b"defg");

        let mut expected = [0u8; 20];
        expected[..3].copy_from_slice(b"abc");
        expected[16..].copy_from_slice(b"defg");

        assert_eq!(acc.finalize(), padded_reference(&key, &expected));
    }

    #[test]
    fn pad_on_boundary_is_noop() {
        let key = [5u8; 32];

        let mut padded = MacAccumulator::new(&key);
        padded.update(&[1u8; 32]);
        padded.pad();
        padded.pad();

        let mut plain = MacAccumulator::new(&key);
        plain.update(&[1u8; 32]);

        assert_eq!(padded.finalize(), plain.finalize());
    }
}
