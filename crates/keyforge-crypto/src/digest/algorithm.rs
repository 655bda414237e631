//! Digest algorithm definitions

use std::fmt;

use ripemd::Ripemd160;
use sha2::Digest;

/// A fixed-output hash function usable by [`crate::DigestState`].
///
/// The context is the primitive's own incremental state; implementations
/// only adapt it to a fixed-size output array.
pub trait HashAlgorithm {
    /// Human-readable algorithm name
    const NAME: &'static str;

    /// Output size in bytes. Also the required node size for
    /// [`crate::root`].
    const OUTPUT_SIZE: usize;

    /// Incremental primitive state
    type Context: Default + Clone;

    /// Digest bytes, always exactly `OUTPUT_SIZE` long
    type Output: AsRef<[u8]> + Copy + Eq + fmt::Debug;

    /// Absorb `data` into the context.
    fn update(ctx: &mut Self::Context, data: &[u8]);

    /// Pad, encode the length and emit the digest.
    fn finalize(ctx: Self::Context) -> Self::Output;
}

/// SHA-512 (64-byte output)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha512;

impl HashAlgorithm for Sha512 {
    const NAME: &'static str = "sha512";
    const OUTPUT_SIZE: usize = 64;

    type Context = sha2::Sha512;
    type Output = [u8; 64];

    fn update(ctx: &mut Self::Context, data: &[u8]) {
        Digest::update(ctx, data);
    }

    fn finalize(ctx: Self::Context) -> Self::Output {
        let mut out = [0u8; 64];
        out.copy_from_slice(&ctx.finalize());
        out
    }
}

/// SHA-256 (32-byte output)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha256;

impl HashAlgorithm for Sha256 {
    const NAME: &'static str = "sha256";
    const OUTPUT_SIZE: usize = 32;

    type Context = sha2::Sha256;
    type Output = [u8; 32];

    fn update(ctx: &mut Self::Context, data: &[u8]) {
        Digest::update(ctx, data);
    }

    fn finalize(ctx: Self::Context) -> Self::Output {
        let mut out = [0u8; 32];
        out.copy_from_slice(&ctx.finalize());
        out
    }
}

/// `RIPEMD160(SHA256(data))` (20-byte output)
///
/// Streams through a SHA-256 context; RIPEMD-160 runs once over the 32-byte
/// inner digest at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash160;

impl HashAlgorithm for Hash160 {
    const NAME: &'static str = "hash160";
    const OUTPUT_SIZE: usize = 20;

    type Context = sha2::Sha256;
    type Output = [u8; 20];

    fn update(ctx: &mut Self::Context, data: &[u8]) {
        Digest::update(ctx, data);
    }

    fn finalize(ctx: Self::Context) -> Self::Output {
        let inner = ctx.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&Ripemd160::digest(inner.as_slice()));
        out
    }
}
