use core::fmt;

use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derive;
use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};
use crate::validate::{CheckKey, CheckLevel};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    e: BigUint,
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    ///
    /// This is the public key load hook: the key is only returned once it
    /// passes the weak structural check.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        let k = Self::new_unchecked(n, e);

        if !k.check_key(CheckLevel::Weak) {
            tracing::warn!(bits = k.n.bits(), "rejecting RSA public key");
            return Err(Error::Validation);
        }

        tracing::debug!(bits = k.n.bits(), "loaded RSA public key");
        Ok(k)
    }

    /// Create a new public key, bypassing the load-time check.
    ///
    /// This method is not recommended for keys of unknown origin; call
    /// [`CheckKey::check_key`] before trusting the result.
    pub fn new_unchecked(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        private_key.pubkey_components.clone()
    }
}

/// Raw private key fields, as read from an encoding or supplied by a caller
/// before the key is loaded.
///
/// `n`, `dp`, `dq` and `qinv` may be omitted (`None`); the load hook in
/// [`RsaPrivateKey::from_components`] recomputes them from `p`, `q` and `d`.
///
/// Loading moves the values into the key, which zeroizes them on drop. A
/// value kept around without being loaded should be cleared with
/// [`Zeroize::zeroize`].
#[derive(Clone, Default)]
pub struct PrivateKeyComponents {
    /// Modulus
    pub n: Option<BigUint>,
    /// Public exponent
    pub e: BigUint,
    /// Private exponent
    pub d: BigUint,
    /// First prime factor
    pub p: BigUint,
    /// Second prime factor
    pub q: BigUint,
    /// D mod (P-1)
    pub dp: Option<BigUint>,
    /// D mod (Q-1)
    pub dq: Option<BigUint>,
    /// Q^-1 mod P
    pub qinv: Option<BigUint>,
}

impl fmt::Debug for PrivateKeyComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyComponents")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

impl Zeroize for PrivateKeyComponents {
    fn zeroize(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

/// Values built once at load time and used by private key operations.
///
/// A value that could not be derived stays `None`; such a key never passes
/// the strong check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: Option<BigUint>,
    /// D mod (Q-1)
    pub(crate) dq: Option<BigUint>,
    /// Q^-1 mod P
    pub(crate) qinv: Option<BigUint>,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Represents a whole RSA key, public and private parts.
#[derive(Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    d: BigUint,
    /// First prime factor of N
    p: BigUint,
    /// Second prime factor of N
    q: BigUint,
    /// CRT values, derived at load time when not supplied
    precomputed: PrecomputedValues,
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("pubkey_components", &self.pubkey_components)
            .finish_non_exhaustive()
    }
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.p == other.p
            && self.q == other.q
            && self.precomputed == other.precomputed
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.precomputed.zeroize();
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

impl RsaPrivateKey {
    /// Load a private key from its raw components.
    ///
    /// This is the private key load hook. Missing values are derived first
    /// (see [`derive_missing`](crate::derive::derive_missing)), then the
    /// precomputed values are built and the key is checked at `level`. A key
    /// that fails the check is reported as [`Error::Validation`].
    pub fn from_components(
        mut components: PrivateKeyComponents,
        level: CheckLevel,
    ) -> Result<RsaPrivateKey> {
        derive::derive_missing(&mut components);
        let k = Self::load(&mut components);

        if !k.check_key(level) {
            tracing::warn!(bits = k.n().bits(), ?level, "rejecting RSA private key");
            return Err(Error::Validation);
        }

        tracing::debug!(bits = k.n().bits(), ?level, "loaded RSA private key");
        Ok(k)
    }

    fn load(components: &mut PrivateKeyComponents) -> RsaPrivateKey {
        // Filled in by `derive_missing`; a key built without it has a zero
        // modulus and fails every check.
        let n = components.n.take().unwrap_or_default();

        RsaPrivateKey {
            pubkey_components: RsaPublicKey::new_unchecked(n, core::mem::take(&mut components.e)),
            d: core::mem::take(&mut components.d),
            p: core::mem::take(&mut components.p),
            q: core::mem::take(&mut components.q),
            precomputed: PrecomputedValues {
                dp: components.dp.take(),
                dq: components.dq.take(),
                qinv: components.qinv.take(),
            },
        }
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    ///
    /// Generally this is not needed since `RsaPrivateKey` implements the `PublicKeyParts` trait,
    /// but it can occasionally be useful to discard the private information entirely.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Copy every field back out into a [`PrivateKeyComponents`].
    pub fn to_components(&self) -> PrivateKeyComponents {
        PrivateKeyComponents {
            n: Some(self.n().clone()),
            e: self.e().clone(),
            d: self.d.clone(),
            p: self.p.clone(),
            q: self.q.clone(),
            dp: self.precomputed.dp.clone(),
            dq: self.precomputed.dq.clone(),
            qinv: self.precomputed.qinv.clone(),
        }
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn p(&self) -> &BigUint {
        &self.p
    }

    fn q(&self) -> &BigUint {
        &self.q
    }

    fn dp(&self) -> Option<&BigUint> {
        self.precomputed.dp.as_ref()
    }

    fn dq(&self) -> Option<&BigUint> {
        self.precomputed.dq.as_ref()
    }

    fn qinv(&self) -> Option<&BigUint> {
        self.precomputed.qinv.as_ref()
    }
}
