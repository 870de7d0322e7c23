//! Error types.

use thiserror::Error;

/// Alias for [`core::result::Result`] with the `rsa-keys` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Structural mismatch in a DER payload: wrong element count, wrong
    /// element type, negative integer, truncated or trailing data.
    #[error("decoding error: {0}")]
    Decoding(pkcs1::der::Error),

    /// A DER payload could not be produced.
    #[error("encoding error: {0}")]
    Encoding(pkcs1::der::Error),

    /// Private key version other than two-prime (`0`).
    #[error("unsupported RSA private key version: {0}")]
    UnsupportedVersion(u32),

    /// The key was decoded but failed the check run by its load hook.
    #[error("key failed load-time validation")]
    Validation,

    /// PKCS#1 error.
    #[error("{0}")]
    Pkcs1(pkcs1::Error),

    /// PKCS#8 error.
    #[error("{0}")]
    Pkcs8(pkcs8::Error),
}

// `der::Error` only implements `Error` with its `std` feature, so it cannot
// be marked `#[from]` in a `no_std` build.
impl From<pkcs1::der::Error> for Error {
    fn from(err: pkcs1::der::Error) -> Error {
        Error::Decoding(err)
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        match err {
            pkcs1::Error::Asn1(err) => Error::Decoding(err),
            err => Error::Pkcs1(err),
        }
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        match err {
            pkcs8::Error::Asn1(err) => Error::Decoding(err),
            err => Error::Pkcs8(err),
        }
    }
}

impl From<Error> for pkcs8::Error {
    fn from(err: Error) -> pkcs8::Error {
        match err {
            Error::Decoding(err) | Error::Encoding(err) => pkcs8::Error::Asn1(err),
            Error::Pkcs8(err) => err,
            Error::Pkcs1(pkcs1::Error::Asn1(err)) => pkcs8::Error::Asn1(err),
            Error::Pkcs1(pkcs1::Error::Pkcs8(err)) => err,
            Error::UnsupportedVersion(_) | Error::Validation | Error::Pkcs1(_) => {
                pkcs8::Error::KeyMalformed
            }
        }
    }
}

impl From<Error> for spki::Error {
    fn from(err: Error) -> spki::Error {
        match err {
            Error::Decoding(err) | Error::Encoding(err) => spki::Error::Asn1(err),
            Error::Pkcs8(pkcs8::Error::PublicKey(err)) => err,
            _ => spki::Error::KeyMalformed,
        }
    }
}
