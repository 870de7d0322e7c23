#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Key lifecycle
//!
//! A key is *unloaded* while its fields are being populated, either by a
//! decoder or by the caller through [`PrivateKeyComponents`]. Loading runs
//! the load hook:
//!
//! - public keys: build the key, then run the weak check;
//! - private keys: derive any omitted value (see [`derive::derive_missing`]),
//!   build the precomputed CRT values, then run the check at the requested
//!   [`CheckLevel`].
//!
//! Once loaded, a key is immutable. [`validate`] can be called on it at any
//! time and never modifies it.
//!
//! # PKCS#1 and PKCS#8
//!
//! The free functions in this crate work on the bare PKCS#1 payloads. The
//! [`pkcs1`] and [`pkcs8`] crates' traits are implemented as well, so the
//! usual envelope and PEM helpers are available:
//!
//! - [`pkcs1::DecodeRsaPrivateKey`], [`pkcs1::EncodeRsaPrivateKey`]
//! - [`pkcs1::DecodeRsaPublicKey`], [`pkcs1::EncodeRsaPublicKey`]
//! - [`pkcs8::DecodePrivateKey`], [`pkcs8::EncodePrivateKey`]
//! - [`pkcs8::DecodePublicKey`], [`pkcs8::EncodePublicKey`]
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # #[cfg(all(feature = "pem", feature = "std"))]
//! # {
//! use rsa_keys::{validate, RsaPublicKey, pkcs8::DecodePublicKey};
//!
//! let pem = "-----BEGIN PUBLIC KEY-----
//! MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAtsQsUV8QpqrygsY+2+JC
//! Q6Fw8/omM71IM2N/R8pPbzbgOl0p78MZGsgPOQ2HSznjD0FPzsH8oO2B5Uftws04
//! LHb2HJAYlz25+lN5cqfHAfa3fgmC38FfwBkn7l582UtPWZ/wcBOnyCgb3yLcvJrX
//! yrt8QxHJgvWO23ITrUVYszImbXQ67YGS0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0N
//! fFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejI
//! n04APPKIjpMyQdnWlby7rNyQtE4+CV+jcFjqJbE/Xilcvqxt6DirjFCvYeKYl1uH
//! LwIDAQAB
//! -----END PUBLIC KEY-----";
//!
//! let public_key = RsaPublicKey::from_public_key_pem(pem)?;
//! assert!(validate(&public_key, false));
//! # }
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;
pub use pkcs1;
pub use pkcs8;

pub mod derive;
pub mod errors;
pub mod traits;
pub mod validate;

mod encoding;
mod key;

pub use crate::{
    encoding::{
        decode_private, decode_private_params, decode_private_with, decode_public,
        encode_private, encode_private_params, encode_public, encode_public_algorithm_id,
        public_algorithm_id,
    },
    errors::{Error, Result},
    key::{PrivateKeyComponents, RsaPrivateKey, RsaPublicKey},
    traits::{PrivateKeyParts, PublicKeyParts},
    validate::{validate, CheckKey, CheckLevel},
};
