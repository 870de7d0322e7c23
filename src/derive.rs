//! Reconstruction of private key values that an encoding may omit.

use num_bigint::Sign::Plus;
use num_bigint::{BigInt, BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::key::PrivateKeyComponents;

/// Fills every unset derivable field of `components`:
///
/// - `n = p * q`
/// - `dp = d mod (p - 1)`
/// - `dq = d mod (q - 1)`
/// - `qinv = q^-1 mod p`
///
/// Each value depends only on `p`, `q` and `d`, never on another derived
/// value. Supplied values are left untouched, even if inconsistent.
///
/// This never fails. A value whose inputs are degenerate (a prime `<= 1`,
/// or `q` not invertible modulo `p`) stays `None` and the key is rejected
/// later by the strong check.
pub fn derive_missing(components: &mut PrivateKeyComponents) {
    if components.n.is_none() {
        components.n = Some(&components.p * &components.q);
        tracing::trace!("derived modulus");
    }

    if components.dp.is_none() {
        components.dp = crt_exponent(&components.d, &components.p);
        tracing::trace!(derived = components.dp.is_some(), "dp");
    }

    if components.dq.is_none() {
        components.dq = crt_exponent(&components.d, &components.q);
        tracing::trace!(derived = components.dq.is_some(), "dq");
    }

    if components.qinv.is_none() {
        components.qinv = crt_coefficient(&components.p, &components.q);
        tracing::trace!(derived = components.qinv.is_some(), "qinv");
    }
}

/// `d mod (prime - 1)`, or `None` when `prime <= 1`.
pub(crate) fn crt_exponent(d: &BigUint, prime: &BigUint) -> Option<BigUint> {
    if prime.is_zero() || prime.is_one() {
        return None;
    }

    Some(d % (prime - BigUint::one()))
}

/// `q^-1 mod p`, or `None` when `p <= 1` or no inverse exists.
pub(crate) fn crt_coefficient(p: &BigUint, q: &BigUint) -> Option<BigUint> {
    if p.is_zero() || p.is_one() || q.is_zero() {
        return None;
    }

    let qinv = q.clone().mod_inverse(p)?;
    qinv.mod_floor(&BigInt::from_biguint(Plus, p.clone()))
        .into_biguint()
}
