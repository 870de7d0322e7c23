//! PKCS#8 and SPKI envelope support.
//!
//! Note: PKCS#1 support for the `pkcs1` crate's traits is achieved through
//! its blanket impls for types which impl the `pkcs8` crate's traits.

use pkcs8::{
    der::asn1::BitStringRef, Document, EncodePrivateKey, EncodePublicKey, SecretDocument,
};

use super::{
    decode_private, decode_private_params, decode_public, encode_private, encode_public,
    public_algorithm_id,
};
use crate::{RsaPrivateKey, RsaPublicKey};

/// Verify that the `AlgorithmIdentifier` of an envelope names RSA.
///
/// Parameters are not inspected here: they carry nothing for RSA.
pub(crate) fn verify_algorithm_id(
    algorithm: &pkcs8::AlgorithmIdentifierRef<'_>,
) -> spki::Result<()> {
    algorithm.assert_algorithm_oid(pkcs1::ALGORITHM_OID)?;
    Ok(())
}

impl TryFrom<pkcs8::PrivateKeyInfo<'_>> for RsaPrivateKey {
    type Error = pkcs8::Error;

    fn try_from(private_key_info: pkcs8::PrivateKeyInfo<'_>) -> pkcs8::Result<Self> {
        verify_algorithm_id(&private_key_info.algorithm)?;

        if let Some(params) = private_key_info.algorithm.parameters {
            decode_private_params(params.value());
        }

        Ok(decode_private(private_key_info.private_key)?)
    }
}

impl TryFrom<pkcs8::SubjectPublicKeyInfoRef<'_>> for RsaPublicKey {
    type Error = spki::Error;

    fn try_from(info: pkcs8::SubjectPublicKeyInfoRef<'_>) -> spki::Result<Self> {
        verify_algorithm_id(&info.algorithm)?;

        let key_bits = info
            .subject_public_key
            .as_bytes()
            .ok_or(spki::Error::KeyMalformed)?;

        Ok(decode_public(key_bits)?)
    }
}

impl EncodePrivateKey for RsaPrivateKey {
    fn to_pkcs8_der(&self) -> pkcs8::Result<SecretDocument> {
        let private_key = encode_private(self)?;

        pkcs8::PrivateKeyInfo::new(public_algorithm_id(), private_key.as_slice()).try_into()
    }
}

impl EncodePublicKey for RsaPublicKey {
    fn to_public_key_der(&self) -> spki::Result<Document> {
        let subject_public_key = encode_public(self)?;

        pkcs8::SubjectPublicKeyInfoRef {
            algorithm: public_algorithm_id(),
            subject_public_key: BitStringRef::new(0, &subject_public_key)?,
        }
        .try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{validate::CheckLevel, PrivateKeyComponents, PrivateKeyParts, PublicKeyParts};
    use num_bigint::BigUint;
    use pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
    use pkcs8::{der::Encode, DecodePrivateKey, DecodePublicKey, ObjectIdentifier};

    fn textbook_key() -> RsaPrivateKey {
        let components = PrivateKeyComponents {
            e: BigUint::from(17u32),
            d: BigUint::from(2753u32),
            p: BigUint::from(61u32),
            q: BigUint::from(53u32),
            ..Default::default()
        };
        RsaPrivateKey::from_components(components, CheckLevel::Strong).unwrap()
    }

    #[test]
    fn pkcs8_private_key_roundtrip() {
        let key = textbook_key();
        let der = key.to_pkcs8_der().unwrap();
        let decoded = RsaPrivateKey::from_pkcs8_der(der.as_bytes()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn pkcs1_private_key_roundtrip() {
        let key = textbook_key();
        let der = key.to_pkcs1_der().unwrap();
        assert_eq!(der.as_bytes(), encode_private(&key).unwrap().as_slice());

        let decoded = RsaPrivateKey::from_pkcs1_der(der.as_bytes()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn spki_public_key_roundtrip() {
        let key = textbook_key().to_public_key();
        let der = key.to_public_key_der().unwrap();
        let decoded = RsaPublicKey::from_public_key_der(der.as_bytes()).unwrap();
        assert_eq!(decoded, key);

        let der = key.to_pkcs1_der().unwrap();
        assert_eq!(RsaPublicKey::from_pkcs1_der(der.as_bytes()).unwrap(), key);
    }

    #[test]
    fn private_key_params_are_skipped() {
        let key = textbook_key();
        let private_key = encode_private(&key).unwrap();

        // An unexpected parameter value is ignored rather than rejected.
        let octets = pkcs8::der::asn1::OctetStringRef::new(&[1, 2, 3]).unwrap();
        let params = pkcs8::der::asn1::AnyRef::from(octets);
        let info = pkcs8::PrivateKeyInfo::new(
            pkcs8::AlgorithmIdentifierRef {
                oid: pkcs1::ALGORITHM_OID,
                parameters: Some(params),
            },
            private_key.as_slice(),
        );
        let decoded = RsaPrivateKey::try_from(info).unwrap();
        assert_eq!(decoded.d(), key.d());
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let key_bits = encode_public(&textbook_key().to_public_key()).unwrap();
        let info = pkcs8::SubjectPublicKeyInfoRef {
            algorithm: pkcs8::AlgorithmIdentifierRef {
                // id-ecPublicKey
                oid: ObjectIdentifier::new_unwrap("1.2.840.10045.2.1"),
                parameters: None,
            },
            subject_public_key: BitStringRef::new(0, &key_bits).unwrap(),
        };
        assert!(matches!(
            RsaPublicKey::try_from(info),
            Err(spki::Error::OidUnknown { .. })
        ));
    }

    #[test]
    fn version_error_surfaces_through_pkcs8() {
        let der = hex_literal::hex!(
            "301b 020101 020123 020105 020103 020105 020107 020103 020103 020103"
        );
        assert!(RsaPrivateKey::from_pkcs1_der(&der).is_err());
        assert!(RsaPrivateKey::from_pkcs8_der(&der).is_err());
    }

    #[test]
    fn algorithm_id_matches_pkcs1() {
        assert_eq!(
            public_algorithm_id().to_der().unwrap(),
            pkcs1::ALGORITHM_ID.to_der().unwrap()
        );
        assert_eq!(textbook_key().n(), &BigUint::from(3233u32));
    }
}
