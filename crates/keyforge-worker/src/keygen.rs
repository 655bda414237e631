//! RSA key-pair generation job

use std::fmt;

use rand::rngs::OsRng;
use rsa::{
    BigUint, RsaPrivateKey, RsaPublicKey,
    traits::{PrivateKeyParts, PublicKeyParts},
};
use zeroize::Zeroizing;

use crate::{
    error::{ExecutionError, SubmitError},
    job::{CryptoJob, JobKind},
};

/// Smallest modulus accepted, in bits.
pub const RSA_MIN_BITS: usize = 512;

/// Largest modulus accepted, in bits.
///
/// `RsaPublicKey::new` refuses moduli above this size, so a larger key could
/// be generated but never loaded back as a public key.
pub const RSA_MAX_BITS: usize = RsaPublicKey::MAX_SIZE;

/// Smallest public exponent accepted. Even exponents are rejected, so the
/// crate's own floor of 2 is raised to 3.
const MIN_EXPONENT: u64 = 3;

/// Largest public exponent accepted (2^33 - 1).
const MAX_EXPONENT: u64 = RsaPublicKey::MAX_PUB_EXPONENT;

/// Generated RSA key in CRT form.
///
/// All components are unsigned big-endian integers. Private components are
/// zeroized on drop.
#[derive(Clone)]
pub struct RsaKeyPair {
    n: Vec<u8>,
    e: Vec<u8>,
    d: Zeroizing<Vec<u8>>,
    p: Zeroizing<Vec<u8>>,
    q: Zeroizing<Vec<u8>>,
    dp: Zeroizing<Vec<u8>>,
    dq: Zeroizing<Vec<u8>>,
    qi: Zeroizing<Vec<u8>>,
}

impl RsaKeyPair {
    /// Modulus `n = p * q`
    pub fn modulus(&self) -> &[u8] {
        &self.n
    }

    /// Public exponent `e`
    pub fn public_exponent(&self) -> &[u8] {
        &self.e
    }

    /// Private exponent `d`
    pub fn private_exponent(&self) -> &[u8] {
        &self.d
    }

    /// First prime `p`
    pub fn prime1(&self) -> &[u8] {
        &self.p
    }

    /// Second prime `q`
    pub fn prime2(&self) -> &[u8] {
        &self.q
    }

    /// `d mod (p - 1)`
    pub fn exponent1(&self) -> &[u8] {
        &self.dp
    }

    /// `d mod (q - 1)`
    pub fn exponent2(&self) -> &[u8] {
        &self.dq
    }

    /// `q^-1 mod p`
    pub fn coefficient(&self) -> &[u8] {
        &self.qi
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        let Some(first) = self.n.first() else {
            return 0;
        };
        (self.n.len() - 1) * 8 + (8 - first.leading_zeros() as usize)
    }

    /// 20-byte identifier of the public key: Hash160 of the modulus.
    pub fn fingerprint(&self) -> [u8; keyforge_crypto::FINGERPRINT_SIZE] {
        keyforge_crypto::fingerprint(&self.n)
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("bits", &self.bits())
            .field("e", &BigUint::from_bytes_be(&self.e))
            .finish_non_exhaustive()
    }
}

/// Generate a two-prime RSA key of `bits` bits with public exponent
/// `exponent`.
///
/// Prime search is randomized (OS entropy) and unbounded in time, bounded
/// only by the primitive's own retry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeyGenJob {
    bits: usize,
    exponent: u64,
}

impl RsaKeyGenJob {
    /// Build a key-generation job. Parameters are checked at submission.
    pub fn new(bits: usize, exponent: u64) -> Self {
        Self { bits, exponent }
    }

    /// Requested modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Requested public exponent.
    pub fn exponent(&self) -> u64 {
        self.exponent
    }
}

impl CryptoJob for RsaKeyGenJob {
    type Output = RsaKeyPair;

    const KIND: JobKind = JobKind::GenerateKeyPair;

    fn validate(&self) -> Result<(), SubmitError> {
        if !(RSA_MIN_BITS..=RSA_MAX_BITS).contains(&self.bits) {
            return Err(SubmitError::InvalidParameter {
                parameter: "modulus bits",
                reason: format!("{} outside {RSA_MIN_BITS}..={RSA_MAX_BITS}", self.bits),
            });
        }

        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&self.exponent) || self.exponent % 2 == 0 {
            return Err(SubmitError::InvalidParameter {
                parameter: "public exponent",
                reason: format!(
                    "{} must be odd and within {MIN_EXPONENT}..={MAX_EXPONENT}",
                    self.exponent
                ),
            });
        }

        Ok(())
    }

    fn execute(self) -> Result<RsaKeyPair, ExecutionError> {
        let exponent = BigUint::from(self.exponent);
        let mut key = RsaPrivateKey::new_with_exp(&mut OsRng, self.bits, &exponent)
            .map_err(|e| ExecutionError::KeyGeneration { reason: e.to_string() })?;
        key.precompute().map_err(|e| ExecutionError::KeyGeneration { reason: e.to_string() })?;

        let [p, q] = key.primes() else {
            return Err(ExecutionError::KeyGeneration {
                reason: format!("expected 2 primes, got {}", key.primes().len()),
            });
        };

        let (Some(dp), Some(dq), Some(qi)) = (key.dp(), key.dq(), key.crt_coefficient()) else {
            return Err(ExecutionError::KeyGeneration {
                reason: "CRT parameters unavailable".to_string(),
            });
        };

        Ok(RsaKeyPair {
            n: key.n().to_bytes_be(),
            e: key.e().to_bytes_be(),
            d: Zeroizing::new(key.d().to_bytes_be()),
            p: Zeroizing::new(p.to_bytes_be()),
            q: Zeroizing::new(q.to_bytes_be()),
            dp: Zeroizing::new(dp.to_bytes_be()),
            dq: Zeroizing::new(dq.to_bytes_be()),
            qi: Zeroizing::new(qi.to_bytes_be()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_be(bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_be(bytes)
    }

    #[test]
    fn generates_consistent_key() {
        let pair = RsaKeyGenJob::new(512, 65537).execute().unwrap();

        assert_eq!(pair.bits(), 512);
        assert_eq!(from_be(pair.public_exponent()), BigUint::from(65537u32));

        let p = from_be(pair.prime1());
        let q = from_be(pair.prime2());
        assert_eq!(&p * &q, from_be(pair.modulus()));

        let one = BigUint::from(1u32);
        let d = from_be(pair.private_exponent());
        assert_eq!(from_be(pair.exponent1()), &d % (&p - &one));
        assert_eq!(from_be(pair.exponent2()), &d % (&q - &one));
        assert_eq!((from_be(pair.coefficient()) * &q) % &p, one);
    }

    #[test]
    fn bounds_follow_public_key_limits() {
        assert_eq!(RSA_MAX_BITS, 4096);
        assert_eq!(MAX_EXPONENT, (1 << 33) - 1);

        let pair = RsaKeyGenJob::new(512, MAX_EXPONENT).execute().unwrap();
        let public = RsaPublicKey::new(from_be(pair.modulus()), from_be(pair.public_exponent()));
        assert!(public.is_ok());
    }

    #[test]
    fn custom_exponent() {
        let pair = RsaKeyGenJob::new(512, 3).execute().unwrap();
        assert_eq!(pair.public_exponent(), &[3]);
    }

    #[test]
    fn fingerprint_covers_modulus() {
        let pair = RsaKeyGenJob::new(512, 65537).execute().unwrap();
        assert_eq!(pair.fingerprint(), keyforge_crypto::fingerprint(pair.modulus()));
    }

    #[test]
    fn bits_out_of_range_rejected() {
        for bits in [0, 256, RSA_MIN_BITS - 1, RSA_MAX_BITS + 1] {
            let result = RsaKeyGenJob::new(bits, 65537).validate();
            assert!(matches!(
                result,
                Err(SubmitError::InvalidParameter { parameter: "modulus bits", .. })
            ));
        }
    }

    #[test]
    fn bad_exponents_rejected() {
        for exponent in [0, 1, 2, 65536, MAX_EXPONENT + 1] {
            let result = RsaKeyGenJob::new(2048, exponent).validate();
            assert!(
                matches!(
                    result,
                    Err(SubmitError::InvalidParameter { parameter: "public exponent", .. })
                ),
                "exponent {exponent} should be rejected"
            );
        }
    }

    #[test]
    fn valid_parameters_accepted() {
        assert!(RsaKeyGenJob::new(RSA_MIN_BITS, 3).validate().is_ok());
        assert!(RsaKeyGenJob::new(2048, 65537).validate().is_ok());
        assert!(RsaKeyGenJob::new(RSA_MAX_BITS, MAX_EXPONENT).validate().is_ok());
    }

    #[test]
    fn debug_hides_private_components() {
        let pair = RsaKeyGenJob::new(512, 65537).execute().unwrap();
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("bits: 512"));
        assert!(!rendered.contains("d:"));
    }
}
