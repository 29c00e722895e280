//! The trust and cryptography capability the verifier is parameterised over.
//!
//! The verifier never decides on its own whether a key or certificate is trustworthy, and it
//! never performs signature or digest computations itself. Those answers come from the
//! embedding system through [`TrustDomain`], which keeps the engine usable across trust store
//! backends and testable with deterministic fakes.
//!
//! Implementations are expected to be synchronous, non-blocking and free of network I/O.
//! When a single implementation is shared across threads it must be safe for concurrent
//! read-only use; the verifier itself holds no state.

use crate::errors::Result;
use crate::oid::ANY_POLICY;
use const_oid::ObjectIdentifier;
use spki::AlgorithmIdentifierRef;

/// Length of a SHA-1 digest, the only hash RFC 6960 uses for `KeyHash`.
pub const SHA1_DIGEST_LEN: usize = 20;

/// Role the certificate under evaluation is expected to play.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EndEntityOrCa {
    /// The certificate must be an end-entity certificate (e.g. a delegated OCSP responder).
    MustBeEndEntity,

    /// The certificate must be a CA certificate.
    MustBeCa,
}

/// Trust the embedding system places in a certificate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TrustLevel {
    /// The certificate is a trust anchor.
    TrustAnchor,

    /// The certificate is trusted only as far as its issuer is.
    InheritsTrust,

    /// The certificate must never be trusted.
    ActivelyDistrusted,
}

/// Certificate policy under which trust is being evaluated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CertPolicyId(ObjectIdentifier);

impl CertPolicyId {
    /// `anyPolicy`, the policy delegated responder certificates are evaluated under.
    pub const ANY_POLICY: Self = Self(ANY_POLICY);

    /// Is this `anyPolicy`?
    pub fn is_any_policy(&self) -> bool {
        self.0 == ANY_POLICY
    }
}

/// Data covered by a signature, together with the signature over it.
///
/// `data` is the literal encoding that was signed (a `tbsResponseData` or a
/// `tbsCertificate`), never a re-encoding of a parsed structure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignedData<'a> {
    /// Signed bytes, including their tag and length.
    pub data: &'a [u8],

    /// Signature algorithm identifier.
    pub algorithm: AlgorithmIdentifierRef<'a>,

    /// Signature value (the contents of the `BIT STRING`, without the unused-bits octet).
    pub signature: &'a [u8],
}

/// Capability providing certificate trust decisions and cryptographic primitives.
///
/// Errors returned for which [`Error::is_fatal`][crate::Error::is_fatal] is true abort
/// verification and are passed to the caller unchanged. Any other error is treated as a
/// negative answer.
///
/// # Example
///
/// A trust domain that accepts delegated responders on their issuer's word, never accepts a
/// CA, and forwards the cryptography to [`crypto`][crate::crypto]:
///
/// ```
/// # #[cfg(feature = "rustcrypto")]
/// # {
/// use ocsp_verify::{
///     crypto, CertPolicyId, EndEntityOrCa, Result, SignedData, TrustDomain, TrustLevel,
///     SHA1_DIGEST_LEN,
/// };
///
/// struct NoAnchors;
///
/// impl TrustDomain for NoAnchors {
///     fn get_cert_trust(
///         &self,
///         role: EndEntityOrCa,
///         _policy: &CertPolicyId,
///         _candidate_cert: &[u8],
///     ) -> Result<TrustLevel> {
///         Ok(match role {
///             EndEntityOrCa::MustBeEndEntity => TrustLevel::InheritsTrust,
///             EndEntityOrCa::MustBeCa => TrustLevel::ActivelyDistrusted,
///         })
///     }
///
///     fn verify_signed_data(&self, signed_data: &SignedData<'_>, spki: &[u8]) -> Result<()> {
///         crypto::verify_signed_data(signed_data, spki)
///     }
///
///     fn digest_buf(&self, item: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]> {
///         crypto::digest_buf(item)
///     }
///
///     fn check_public_key(&self, spki: &[u8]) -> Result<()> {
///         crypto::check_public_key(spki)
///     }
/// }
///
/// let policy = CertPolicyId::ANY_POLICY;
/// assert_eq!(
///     NoAnchors.get_cert_trust(EndEntityOrCa::MustBeCa, &policy, &[]),
///     Ok(TrustLevel::ActivelyDistrusted)
/// );
/// # }
/// ```
pub trait TrustDomain {
    /// Trust level of `candidate_cert` (a DER `Certificate`) for `role` under `policy`.
    fn get_cert_trust(
        &self,
        role: EndEntityOrCa,
        policy: &CertPolicyId,
        candidate_cert: &[u8],
    ) -> Result<TrustLevel>;

    /// Verify `signed_data` with the key in `subject_public_key_info` (DER).
    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()>;

    /// SHA-1 digest of `item`.
    fn digest_buf(&self, item: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]>;

    /// Check that the key in `subject_public_key_info` (DER) is acceptable before it is used.
    fn check_public_key(&self, subject_public_key_info: &[u8]) -> Result<()>;
}

impl<T: TrustDomain + ?Sized> TrustDomain for &T {
    fn get_cert_trust(
        &self,
        role: EndEntityOrCa,
        policy: &CertPolicyId,
        candidate_cert: &[u8],
    ) -> Result<TrustLevel> {
        (**self).get_cert_trust(role, policy, candidate_cert)
    }

    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()> {
        (**self).verify_signed_data(signed_data, subject_public_key_info)
    }

    fn digest_buf(&self, item: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]> {
        (**self).digest_buf(item)
    }

    fn check_public_key(&self, subject_public_key_info: &[u8]) -> Result<()> {
        (**self).check_public_key(subject_public_key_info)
    }
}
