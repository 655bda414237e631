//! Subcommand implementations.
//!
//! Each command takes decoded arguments and returns the text to print, so
//! the binary's only job is parsing and output.

use clap::ValueEnum;
use keyforge_crypto::{
    CryptoError, DigestState, Hash160, HashAlgorithm, KEY_SIZE, Sha256, Sha512, TAG_SIZE,
};
use keyforge_worker::{Executor, KdfDigest, Pbkdf2Job, RsaKeyGenJob, RsaKeyPair};

use crate::error::{CliError, decode_hex};

/// Hash function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// SHA-512 (64-byte output)
    Sha512,
    /// SHA-256 (32-byte output)
    Sha256,
    /// RIPEMD-160 over SHA-256 (20-byte output)
    Hash160,
}

/// PBKDF2 PRF selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Prf {
    /// HMAC-SHA-256
    Sha256,
    /// HMAC-SHA-512
    Sha512,
}

impl From<Prf> for KdfDigest {
    fn from(prf: Prf) -> Self {
        match prf {
            Prf::Sha256 => Self::Sha256,
            Prf::Sha512 => Self::Sha512,
        }
    }
}

/// Hash the concatenation of `parts`, fed to the engine one at a time.
pub fn digest(algorithm: Algorithm, parts: &[String]) -> Result<String, CliError> {
    match algorithm {
        Algorithm::Sha512 => stream::<Sha512>(parts),
        Algorithm::Sha256 => stream::<Sha256>(parts),
        Algorithm::Hash160 => stream::<Hash160>(parts),
    }
}

fn stream<H: HashAlgorithm>(parts: &[String]) -> Result<String, CliError> {
    let mut state = DigestState::<H>::new();
    for (i, part) in parts.iter().enumerate() {
        let bytes = decode_hex("data", part)?;
        state.update(&bytes)?;
        tracing::trace!(part = i, len = bytes.len(), "Absorbed input");
    }
    Ok(hex::encode(state.finalize()?))
}

/// Combine two child hashes into a parent node.
pub fn root(algorithm: Algorithm, left: &str, right: &str) -> Result<String, CliError> {
    let left = decode_hex("left", left)?;
    let right = decode_hex("right", right)?;

    let node = match algorithm {
        Algorithm::Sha512 => hex::encode(keyforge_crypto::root::<Sha512>(&left, &right)?),
        Algorithm::Sha256 => hex::encode(keyforge_crypto::root::<Sha256>(&left, &right)?),
        Algorithm::Hash160 => hex::encode(keyforge_crypto::root::<Hash160>(&left, &right)?),
    };
    Ok(node)
}

fn parse_key(key: &str) -> Result<[u8; KEY_SIZE], CliError> {
    let bytes = decode_hex("key", key)?;
    let actual = bytes.len();
    <[u8; KEY_SIZE]>::try_from(bytes.as_slice())
        .map_err(|_| CryptoError::InvalidLength { what: "key", expected: KEY_SIZE, actual }.into())
}

/// Encrypt and authenticate; prints `ciphertext || tag`.
pub fn seal(key: &str, nonce: &str, aad: &str, plaintext: &str) -> Result<String, CliError> {
    let key = parse_key(key)?;
    let nonce = decode_hex("nonce", nonce)?;
    let aad = decode_hex("aad", aad)?;
    let plaintext = decode_hex("plaintext", plaintext)?;

    let sealed = keyforge_crypto::seal(&key, &nonce, &aad, &plaintext)?;
    Ok(hex::encode(sealed.to_combined()))
}

/// Verify and decrypt `ciphertext || tag`; prints the plaintext.
pub fn open(key: &str, nonce: &str, aad: &str, sealed: &str) -> Result<String, CliError> {
    let key = parse_key(key)?;
    let nonce = decode_hex("nonce", nonce)?;
    let aad = decode_hex("aad", aad)?;
    let sealed = decode_hex("sealed", sealed)?;

    let Some(split) = sealed.len().checked_sub(TAG_SIZE) else {
        return Err(CryptoError::InvalidLength {
            what: "sealed message",
            expected: TAG_SIZE,
            actual: sealed.len(),
        }
        .into());
    };
    let (ciphertext, tag) = sealed.split_at(split);

    let plaintext = keyforge_crypto::open(&key, &nonce, &aad, ciphertext, tag)?;
    Ok(hex::encode(plaintext))
}

/// Derive a key on the background executor.
pub async fn pbkdf2(
    executor: &Executor,
    prf: Prf,
    password: &str,
    salt: &str,
    iterations: u32,
    length: usize,
) -> Result<String, CliError> {
    let password = decode_hex("password", password)?;
    let salt = decode_hex("salt", salt)?;

    let handle = executor.submit(Pbkdf2Job::new(prf.into(), password, salt, iterations, length))?;
    tracing::info!(job_id = %handle.id(), "Deriving key");

    let key = handle.await?;
    Ok(hex::encode(key.as_bytes()))
}

/// Generate an RSA key pair on the background executor.
pub async fn rsa_keygen(
    executor: &Executor,
    bits: usize,
    exponent: u64,
) -> Result<String, CliError> {
    let handle = executor.submit(RsaKeyGenJob::new(bits, exponent))?;
    tracing::info!(job_id = %handle.id(), bits, "Generating key pair");

    let pair = handle.await?;
    Ok(render_key_pair(&pair))
}

/// One `name=hex` line per component.
fn render_key_pair(pair: &RsaKeyPair) -> String {
    [
        ("n", pair.modulus()),
        ("e", pair.public_exponent()),
        ("d", pair.private_exponent()),
        ("p", pair.prime1()),
        ("q", pair.prime2()),
        ("dp", pair.exponent1()),
        ("dq", pair.exponent2()),
        ("qi", pair.coefficient()),
    ]
    .iter()
    .map(|(name, value)| format!("{name}={}", hex::encode(value)))
    .collect::<Vec<_>>()
    .join("\n")
}
