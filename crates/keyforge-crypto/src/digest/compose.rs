//! One-shot and composite digest helpers

use super::algorithm::{Hash160, HashAlgorithm};
use crate::error::CryptoError;

/// Size of a [`fingerprint`] in bytes.
pub const FINGERPRINT_SIZE: usize = Hash160::OUTPUT_SIZE;

/// Hash `data` in one call.
///
/// Byte-identical to `new(); update(data); finalize()` on a
/// [`crate::DigestState`].
pub fn digest<H: HashAlgorithm>(data: &[u8]) -> H::Output {
    let mut ctx = H::Context::default();
    H::update(&mut ctx, data);
    H::finalize(ctx)
}

/// Hash two child digests into their parent node: `H(left || right)`.
///
/// # Errors
///
/// - `InvalidLength` unless both children are exactly `H::OUTPUT_SIZE`
///   bytes. Checked before any hashing.
pub fn root<H: HashAlgorithm>(left: &[u8], right: &[u8]) -> Result<H::Output, CryptoError> {
    check_node("left node", H::OUTPUT_SIZE, left)?;
    check_node("right node", H::OUTPUT_SIZE, right)?;

    let mut ctx = H::Context::default();
    H::update(&mut ctx, left);
    H::update(&mut ctx, right);
    Ok(H::finalize(ctx))
}

/// Hash two or three fields as one stream: `H(a || b || c)`.
///
/// A missing `c` hashes exactly like an empty one, so `multi(a, b, None)`
/// equals `multi(a, b, Some(&[]))` equals `digest(a || b)`. Field
/// boundaries are not encoded; callers that need them unambiguous must use
/// fixed-size fields or frame them first.
pub fn multi<H: HashAlgorithm>(a: &[u8], b: &[u8], c: Option<&[u8]>) -> H::Output {
    let mut ctx = H::Context::default();
    H::update(&mut ctx, a);
    H::update(&mut ctx, b);
    H::update(&mut ctx, c.unwrap_or_default());
    H::finalize(ctx)
}

/// Compact identifier `RIPEMD160(SHA256(data))`.
pub fn fingerprint(data: &[u8]) -> [u8; FINGERPRINT_SIZE] {
    digest::<Hash160>(data)
}

fn check_node(what: &'static str, expected: usize, node: &[u8]) -> Result<(), CryptoError> {
    if node.len() == expected {
        Ok(())
    } else {
        Err(CryptoError::InvalidLength { what, expected, actual: node.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{Sha256, Sha512};

    #[test]
    fn root_of_zero_nodes_known_answer() {
        let zero = [0u8; 64];
        let parent = root::<Sha512>(&zero, &zero).unwrap();
        assert_eq!(
            hex::encode(parent),
            "ab942f526272e456ed68a979f50202905ca903a141ed98443567b11ef0bf25a5\
             52d639051a01be58558122c58e3de07d749ee59ded36acf0c55cd91924d6ba11"
        );
    }

    #[test]
    fn root_equals_digest_of_concatenation() {
        let left = digest::<Sha512>(b"left");
        let right = digest::<Sha512>(b"right");

        let mut joined = left.to_vec();
        joined.extend_from_slice(&right);

        assert_eq!(root::<Sha512>(&left, &right).unwrap(), digest::<Sha512>(&joined));
    }

    #[test]
    fn root_is_order_sensitive() {
        let left = digest::<Sha512>(b"left");
        let right = digest::<Sha512>(b"right");

        assert_ne!(root::<Sha512>(&left, &right).unwrap(), root::<Sha512>(&right, &left).unwrap());
    }

    #[test]
    fn root_rejects_short_left_node() {
        let result = root::<Sha512>(&[0u8; 63], &[0u8; 64]);
        assert_eq!(
            result,
            Err(CryptoError::InvalidLength { what: "left node", expected: 64, actual: 63 })
        );
    }

    #[test]
    fn root_rejects_long_right_node() {
        // Strict equality, not "at least"
        let result = root::<Sha512>(&[0u8; 64], &[0u8; 65]);
        assert_eq!(
            result,
            Err(CryptoError::InvalidLength { what: "right node", expected: 64, actual: 65 })
        );
    }

    #[test]
    fn root_node_size_follows_algorithm() {
        let zero = [0u8; 20];
        assert_eq!(
            hex::encode(root::<Hash160>(&zero, &zero).unwrap()),
            "788f620e75354df40d8b9a10db7de8234e162561"
        );
        assert!(root::<Hash160>(&[0u8; 64], &[0u8; 64]).is_err());
        assert!(root::<Sha256>(&[0u8; 32], &[0u8; 32]).is_ok());
    }

    #[test]
    fn multi_missing_third_equals_empty_third() {
        let absent = multi::<Sha512>(b"alpha", b"beta", None);
        let empty = multi::<Sha512>(b"alpha", b"beta", Some(b"".as_slice()));
        assert_eq!(absent, empty);
        assert_eq!(absent, digest::<Sha512>(b"alphabeta"));
    }

    #[test]
    fn multi_with_three_fields() {
        assert_eq!(
            multi::<Sha512>(b"a", b"b", Some(b"c".as_slice())),
            digest::<Sha512>(b"abc")
        );
    }

    #[test]
    fn multi_accepts_empty_fields() {
        assert_eq!(multi::<Hash160>(b"", b"", None), digest::<Hash160>(b""));
    }

    #[test]
    fn fingerprint_is_twenty_bytes() {
        let fp = fingerprint(b"abc");
        assert_eq!(fp.len(), FINGERPRINT_SIZE);
        assert_eq!(hex::encode(fp), "bb1be98c142444d7a56aa3981c3942a978e4dc33");
    }
}
