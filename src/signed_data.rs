//! Signed-data extraction and the signature verification adapter.

use crate::errors::{Error, Result};
use crate::trust::{SignedData, TrustDomain};
use der::asn1::BitStringRef;
use der::Decode;
use log::debug;
use spki::AlgorithmIdentifierRef;

/// Assemble [`SignedData`] from the three components of a `SIGNED{...}` structure: the signed
/// encoding, the `AlgorithmIdentifier` encoding and the `BIT STRING` encoding.
pub(crate) fn from_components<'a>(
    data: &'a [u8],
    algorithm: &'a [u8],
    signature: &'a [u8],
) -> Result<SignedData<'a>> {
    let algorithm = AlgorithmIdentifierRef::from_der(algorithm)?;
    let signature = BitStringRef::from_der(signature)?
        .as_bytes()
        .ok_or(Error::BadDer)?;

    Ok(SignedData {
        data,
        algorithm,
        signature,
    })
}

/// Check the key and verify `signed_data` with it, exactly once.
///
/// Every non-fatal failure is reported as [`Error::InvalidSigningCert`]: callers must not be
/// able to tell a bad signature from an unsupported algorithm or a weak key.
pub(crate) fn verify<T: TrustDomain + ?Sized>(
    trust_domain: &T,
    signed_data: &SignedData<'_>,
    subject_public_key_info: &[u8],
) -> Result<()> {
    trust_domain
        .check_public_key(subject_public_key_info)
        .and_then(|()| trust_domain.verify_signed_data(signed_data, subject_public_key_info))
        .map_err(|err| {
            if err.is_fatal() {
                return err;
            }
            debug!("signature verification failed: {}", err);
            Error::InvalidSigningCert
        })
}
