//! Identifier of the certificate whose status is being queried.

use crate::errors::Result;
use crate::trust::{TrustDomain, SHA1_DIGEST_LEN};
use der::Decode;
use spki::SubjectPublicKeyInfoRef;

/// The certificate an OCSP response is checked against.
///
/// Unlike the `CertID` carried on the wire, which holds hashes, this holds references to the
/// issuer's name and key, so the same value can be matched against `CertID`s and responder
/// IDs regardless of how the responder encoded them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CertId<'a> {
    /// DER encoding of the issuer's `Name` (the `issuer` field of the certificate).
    pub issuer: &'a [u8],

    /// DER encoding of the issuer's `SubjectPublicKeyInfo`.
    pub issuer_subject_public_key_info: &'a [u8],

    /// Contents octets of the certificate's `serialNumber` INTEGER.
    pub serial_number: &'a [u8],
}

impl<'a> CertId<'a> {
    /// Create a new certificate identifier.
    pub const fn new(
        issuer: &'a [u8],
        issuer_subject_public_key_info: &'a [u8],
        serial_number: &'a [u8],
    ) -> Self {
        Self {
            issuer,
            issuer_subject_public_key_info,
            serial_number,
        }
    }
}

/// SHA-1 of the `subjectPublicKey` BIT STRING contents of `subject_public_key_info`, as used
/// by `KeyHash` and `issuerKeyHash` in RFC 6960.
pub(crate) fn key_hash<T: TrustDomain + ?Sized>(
    trust_domain: &T,
    subject_public_key_info: &[u8],
) -> Result<[u8; SHA1_DIGEST_LEN]> {
    let spki = SubjectPublicKeyInfoRef::from_der(subject_public_key_info)?;
    trust_domain.digest_buf(spki.subject_public_key.raw_bytes())
}
