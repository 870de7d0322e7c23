//! Weak (structural) and strong (algebraic and primality) key checks.

use alloc::vec::Vec;

use num_bigint::{prime::probably_prime, BigUint};
use num_integer::Integer;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::derive::{crt_coefficient, crt_exponent};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Smallest accepted modulus: 35 = 5 × 7, the smallest product of two
/// distinct odd primes.
pub const MIN_MODULUS: u32 = 35;

/// Smallest accepted public and private exponent.
pub const MIN_EXPONENT: u32 = 2;

/// Smallest accepted prime factor.
pub const MIN_PRIME: u32 = 3;

/// Miller-Rabin rounds used by the strong check.
pub const PRIME_TEST_ROUNDS: usize = 20;

/// How thoroughly a key is checked.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CheckLevel {
    /// Structural bounds and `n == p * q`. Suitable for keys from a trusted
    /// source.
    #[default]
    Weak,

    /// Everything in [`CheckLevel::Weak`], plus the CRT values and primality
    /// of `p` and `q`. Required for keys from untrusted input.
    Strong,
}

impl CheckLevel {
    /// Maps the `strong` flag of [`validate`] to a level.
    pub fn from_strong(strong: bool) -> Self {
        if strong {
            CheckLevel::Strong
        } else {
            CheckLevel::Weak
        }
    }
}

/// Consistency check for a loaded key.
///
/// The check never mutates the key and returns a single verdict: any failing
/// condition fails the whole check.
pub trait CheckKey {
    /// Returns `true` if the key passes every check of `level`.
    fn check_key(&self, level: CheckLevel) -> bool;
}

/// Checks `key`, with the strong checks when `strong` is set.
pub fn validate<K: CheckKey + ?Sized>(key: &K, strong: bool) -> bool {
    key.check_key(CheckLevel::from_strong(strong))
}

impl CheckKey for RsaPublicKey {
    /// A public key has no structure beyond `n` and `e`, so both levels run
    /// the same check.
    fn check_key(&self, _level: CheckLevel) -> bool {
        check_public(self)
    }
}

impl CheckKey for RsaPrivateKey {
    fn check_key(&self, level: CheckLevel) -> bool {
        match level {
            CheckLevel::Weak => check_private_weak(self),
            CheckLevel::Strong => check_private_weak(self) && check_private_strong(self),
        }
    }
}

fn check_public(key: &impl PublicKeyParts) -> bool {
    let n = key.n();

    *n >= BigUint::from(MIN_MODULUS) && n.is_odd() && *key.e() >= BigUint::from(MIN_EXPONENT)
}

fn check_private_weak(key: &impl PrivateKeyParts) -> bool {
    let min_prime = BigUint::from(MIN_PRIME);

    check_public(key)
        && *key.d() >= BigUint::from(MIN_EXPONENT)
        && *key.p() >= min_prime
        && *key.q() >= min_prime
        && key.p() * key.q() == *key.n()
}

/// Assumes the weak check has passed.
fn check_private_strong(key: &impl PrivateKeyParts) -> bool {
    let width = key.size();

    let dp = Zeroizing::new(crt_exponent(key.d(), key.p()));
    let dq = Zeroizing::new(crt_exponent(key.d(), key.q()));
    let qinv = Zeroizing::new(crt_coefficient(key.p(), key.q()));

    let crt_ok = ct_eq_uint(key.dp(), (*dp).as_ref(), width)
        & ct_eq_uint(key.dq(), (*dq).as_ref(), width)
        & ct_eq_uint(key.qinv(), (*qinv).as_ref(), width);

    bool::from(crt_ok)
        && probably_prime(key.p(), PRIME_TEST_ROUNDS)
        && probably_prime(key.q(), PRIME_TEST_ROUNDS)
}

/// Constant-time comparison of a stored value with its recomputed value over
/// `width`-byte big-endian encodings. Unset values never match.
fn ct_eq_uint(stored: Option<&BigUint>, expected: Option<&BigUint>, width: usize) -> Choice {
    let (stored, expected) = match (stored, expected) {
        (Some(stored), Some(expected)) => (stored, expected),
        _ => return Choice::from(0),
    };

    match (left_pad(stored, width), left_pad(expected, width)) {
        (Some(a), Some(b)) => a.as_slice().ct_eq(b.as_slice()),
        _ => Choice::from(0),
    }
}

/// Returns `value` as big-endian bytes, left padded with zeros to `padded_len`,
/// or `None` if it does not fit.
fn left_pad(value: &BigUint, padded_len: usize) -> Option<Zeroizing<Vec<u8>>> {
    let input = Zeroizing::new(value.to_bytes_be());
    if input.len() > padded_len {
        return None;
    }

    let mut out = Zeroizing::new(vec![0u8; padded_len]);
    out[padded_len - input.len()..].copy_from_slice(&input);
    Some(out)
}
