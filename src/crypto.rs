//! RSA PKCS#1 v1.5 and SHA-1 primitives for [`TrustDomain`][crate::TrustDomain]
//! implementations, built on the RustCrypto `rsa`, `sha1` and `sha2` crates.
//!
//! These cover what deployed OCSP responders use. A trust domain can forward its
//! `verify_signed_data`, `digest_buf` and `check_public_key` methods here and only supply
//! `get_cert_trust` itself.

use crate::errors::{Error, Result};
use crate::oid::{
    RSA_ENCRYPTION, SHA_1_WITH_RSA_ENCRYPTION, SHA_256_WITH_RSA_ENCRYPTION,
    SHA_384_WITH_RSA_ENCRYPTION, SHA_512_WITH_RSA_ENCRYPTION,
};
use crate::trust::{SignedData, SHA1_DIGEST_LEN};
use const_oid::AssociatedOid;
use der::asn1::AnyRef;
use der::Decode;
use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use signature::Verifier;
use spki::SubjectPublicKeyInfoRef;

/// Smallest accepted RSA modulus, in bits.
pub const MIN_RSA_MODULUS_BITS: usize = 1024;

/// Verify `signed_data` with the RSA key in `subject_public_key_info`.
///
/// Supports `sha1WithRSAEncryption`, `sha256WithRSAEncryption`, `sha384WithRSAEncryption` and
/// `sha512WithRSAEncryption`, with absent or `NULL` parameters.
pub fn verify_signed_data(
    signed_data: &SignedData<'_>,
    subject_public_key_info: &[u8],
) -> Result<()> {
    let algorithm = &signed_data.algorithm;
    if !algorithm
        .parameters
        .map_or(true, |parameters| parameters == AnyRef::NULL)
    {
        return Err(Error::UnsupportedAlgorithm);
    }

    let key = rsa_public_key(subject_public_key_info)?;
    let (data, signature) = (signed_data.data, signed_data.signature);

    if algorithm.oid == SHA_256_WITH_RSA_ENCRYPTION {
        verify_pkcs1v15::<Sha256>(key, data, signature)
    } else if algorithm.oid == SHA_1_WITH_RSA_ENCRYPTION {
        verify_pkcs1v15::<Sha1>(key, data, signature)
    } else if algorithm.oid == SHA_384_WITH_RSA_ENCRYPTION {
        verify_pkcs1v15::<Sha384>(key, data, signature)
    } else if algorithm.oid == SHA_512_WITH_RSA_ENCRYPTION {
        verify_pkcs1v15::<Sha512>(key, data, signature)
    } else {
        Err(Error::UnsupportedAlgorithm)
    }
}

fn verify_pkcs1v15<D>(key: RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<()>
where
    D: Digest + AssociatedOid,
{
    let signature = pkcs1v15::Signature::try_from(signature)?;
    pkcs1v15::VerifyingKey::<D>::new(key).verify(data, &signature)?;
    Ok(())
}

/// SHA-1 digest of `item`.
pub fn digest_buf(item: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]> {
    Ok(Sha1::digest(item).into())
}

/// Accept RSA keys with a modulus of at least [`MIN_RSA_MODULUS_BITS`] bits.
pub fn check_public_key(subject_public_key_info: &[u8]) -> Result<()> {
    let key = rsa_public_key(subject_public_key_info)?;
    if key.size() * 8 < MIN_RSA_MODULUS_BITS {
        return Err(Error::InvalidKey);
    }
    Ok(())
}

fn rsa_public_key(subject_public_key_info: &[u8]) -> Result<RsaPublicKey> {
    let spki = SubjectPublicKeyInfoRef::from_der(subject_public_key_info)
        .map_err(|_| Error::InvalidKey)?;
    if spki.algorithm.oid != RSA_ENCRYPTION {
        return Err(Error::UnsupportedAlgorithm);
    }
    RsaPublicKey::from_public_key_der(subject_public_key_info).map_err(|_| Error::InvalidKey)
}
