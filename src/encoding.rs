//! PKCS#1 encoding support.
//!
//! The payloads are DER sequences of unsigned integers:
//!
//! ```text
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER   -- e
//! }
//!
//! RSAPrivateKey ::= SEQUENCE {
//!     version           INTEGER,  -- 0
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER,  -- e
//!     privateExponent   INTEGER,  -- d
//!     prime1            INTEGER,  -- p
//!     prime2            INTEGER,  -- q
//!     exponent1         INTEGER,  -- d mod (p-1)
//!     exponent2         INTEGER,  -- d mod (q-1)
//!     coefficient       INTEGER   -- (inverse of q) mod p
//! }
//! ```
//!
//! Decoding is strict: the element count, the element types and the absence
//! of trailing data are all enforced. A zero `modulus`, `exponent1`,
//! `exponent2` or `coefficient` is read as omitted and recomputed when the key
//! is loaded.
//!
//! PKCS#8 and SPKI envelopes are supported through the `pkcs8` crate's
//! traits, see the `envelope` module.

mod envelope;

use alloc::vec::Vec;

use num_bigint::BigUint;
use num_traits::Zero;
use pkcs1::der::{
    asn1::{AnyRef, Null, UintRef},
    Decode, Encode, Reader, SliceReader, Tag, Tagged,
};
use pkcs8::AlgorithmIdentifierRef;
use zeroize::Zeroizing;

use crate::{
    errors::{Error, Result},
    key::{PrivateKeyComponents, RsaPrivateKey, RsaPublicKey},
    traits::{PrivateKeyParts, PublicKeyParts},
    validate::CheckLevel,
};

/// Version of a two-prime `RSAPrivateKey`.
const TWO_PRIME_VERSION: u32 = 0;

/// `AlgorithmIdentifier` for RSA keys: the `rsaEncryption` OID with a NULL
/// parameter.
pub fn public_algorithm_id() -> AlgorithmIdentifierRef<'static> {
    pkcs1::ALGORITHM_ID
}

/// DER encoding of [`public_algorithm_id`].
pub fn encode_public_algorithm_id() -> Result<Vec<u8>> {
    public_algorithm_id().to_der().map_err(Error::Encoding)
}

/// Encode the public key as a PKCS#1 `RSAPublicKey`.
pub fn encode_public(key: &RsaPublicKey) -> Result<Vec<u8>> {
    let modulus = key.n().to_bytes_be();
    let public_exponent = key.e().to_bytes_be();

    pkcs1::RsaPublicKey {
        modulus: UintRef::new(&modulus).map_err(Error::Encoding)?,
        public_exponent: UintRef::new(&public_exponent).map_err(Error::Encoding)?,
    }
    .to_der()
    .map_err(Error::Encoding)
}

/// Decode a PKCS#1 `RSAPublicKey` and load it.
///
/// Loading runs the weak check; a key that fails it is reported as
/// [`Error::Validation`].
pub fn decode_public(key_bits: &[u8]) -> Result<RsaPublicKey> {
    let mut reader = open_sequence(key_bits)?;

    let n = read_uint(&mut reader)?;
    let e = read_uint(&mut reader)?;
    reader.finish(())?;

    RsaPublicKey::new(n, e)
}

/// Encode the private key as a two-prime PKCS#1 `RSAPrivateKey`.
///
/// A CRT value that could not be derived is written as zero.
pub fn encode_private(key: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    let modulus = key.n().to_bytes_be();
    let public_exponent = key.e().to_bytes_be();
    let private_exponent = Zeroizing::new(key.d().to_bytes_be());
    let prime1 = Zeroizing::new(key.p().to_bytes_be());
    let prime2 = Zeroizing::new(key.q().to_bytes_be());
    let exponent1 = Zeroizing::new(to_bytes_or_zero(key.dp()));
    let exponent2 = Zeroizing::new(to_bytes_or_zero(key.dq()));
    let coefficient = Zeroizing::new(to_bytes_or_zero(key.qinv()));

    let der = pkcs1::RsaPrivateKey {
        modulus: UintRef::new(&modulus).map_err(Error::Encoding)?,
        public_exponent: UintRef::new(&public_exponent).map_err(Error::Encoding)?,
        private_exponent: UintRef::new(&private_exponent).map_err(Error::Encoding)?,
        prime1: UintRef::new(&prime1).map_err(Error::Encoding)?,
        prime2: UintRef::new(&prime2).map_err(Error::Encoding)?,
        exponent1: UintRef::new(&exponent1).map_err(Error::Encoding)?,
        exponent2: UintRef::new(&exponent2).map_err(Error::Encoding)?,
        coefficient: UintRef::new(&coefficient).map_err(Error::Encoding)?,
        other_prime_infos: None,
    }
    .to_der()
    .map_err(Error::Encoding)?;

    Ok(Zeroizing::new(der))
}

/// Decode a PKCS#1 `RSAPrivateKey` and load it with the weak check.
pub fn decode_private(bytes: &[u8]) -> Result<RsaPrivateKey> {
    decode_private_with(bytes, CheckLevel::default())
}

/// Decode a PKCS#1 `RSAPrivateKey` and load it, checking it at `level`.
///
/// A version other than `0` fails with [`Error::UnsupportedVersion`] before
/// any key field is read. After decoding, missing values are derived and the
/// key is checked; a failed check is reported as [`Error::Validation`].
pub fn decode_private_with(bytes: &[u8], level: CheckLevel) -> Result<RsaPrivateKey> {
    let components = decode_private_components(bytes)?;
    RsaPrivateKey::from_components(components, level)
}

/// Algorithm parameters for a private key: always NULL.
pub fn encode_private_params() -> Result<Vec<u8>> {
    Null.to_der().map_err(Error::Encoding)
}

/// Consumes the algorithm parameters of a private key.
///
/// RSA keys carry no parameters, so whatever is present is skipped up to the
/// end of the input and never interpreted. Returns the number of bytes
/// skipped.
pub fn decode_private_params(params: &[u8]) -> usize {
    let mut elements = 0usize;

    if let Ok(mut reader) = SliceReader::new(params) {
        while !reader.is_finished() {
            // Anything that is not a DER element is skipped with the rest.
            if reader.decode::<AnyRef<'_>>().is_err() {
                break;
            }
            elements += 1;
        }
    }

    let skipped = params.len();
    if skipped > 0 {
        tracing::trace!(
            skipped,
            elements,
            "ignoring RSA private key algorithm parameters"
        );
    }
    skipped
}

fn decode_private_components(bytes: &[u8]) -> Result<PrivateKeyComponents> {
    let mut reader = open_sequence(bytes)?;

    let version: u32 = reader.decode()?;
    if version != TWO_PRIME_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let n = read_uint(&mut reader)?;
    let e = read_uint(&mut reader)?;
    let d = read_uint(&mut reader)?;
    let p = read_uint(&mut reader)?;
    let q = read_uint(&mut reader)?;
    let dp = read_uint(&mut reader)?;
    let dq = read_uint(&mut reader)?;
    let qinv = read_uint(&mut reader)?;

    let components = PrivateKeyComponents {
        n: omitted_if_zero(n),
        e,
        d,
        p,
        q,
        dp: omitted_if_zero(dp),
        dq: omitted_if_zero(dq),
        qinv: omitted_if_zero(qinv),
    };

    Ok(reader.finish(components)?)
}

/// Reads a single DER `SEQUENCE` spanning all of `bytes` and returns a reader
/// over its contents.
fn open_sequence(bytes: &[u8]) -> Result<SliceReader<'_>> {
    let sequence = AnyRef::from_der(bytes)?;
    sequence.tag().assert_eq(Tag::Sequence)?;

    Ok(SliceReader::new(sequence.value())?)
}

fn read_uint(reader: &mut SliceReader<'_>) -> Result<BigUint> {
    let uint: UintRef<'_> = reader.decode()?;
    Ok(BigUint::from_bytes_be(uint.as_bytes()))
}

fn omitted_if_zero(value: BigUint) -> Option<BigUint> {
    if value.is_zero() {
        None
    } else {
        Some(value)
    }
}

fn to_bytes_or_zero(value: Option<&BigUint>) -> Vec<u8> {
    match value {
        Some(value) => value.to_bytes_be(),
        None => vec![0],
    }
}
