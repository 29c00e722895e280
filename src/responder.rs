//! Working out who signed a response, and whether they were allowed to.
//!
//! A response is acceptable when it is signed either by the issuer of the certificate in
//! question or by a responder the issuer has delegated to (RFC 6960 section 4.2.2.2). A
//! delegated responder must present a certificate issued directly by that issuer; longer
//! chains are never followed.

use crate::cert::Certificate;
use crate::cert_id::{key_hash, CertId};
use crate::errors::{Error, Result};
use crate::response::{BasicResponse, ResponderId};
use crate::signed_data;
use crate::time::Time;
use crate::trust::{CertPolicyId, EndEntityOrCa, TrustDomain, TrustLevel};
use log::{debug, trace};

/// The party identified by a response's `responderID`.
#[derive(Debug)]
pub(crate) enum Responder<'a> {
    /// The issuer of the certificate whose status is being checked.
    Issuer,

    /// A certificate from the response's `certs`, not yet authorized.
    Delegated(Certificate<'a>),
}

/// Resolve the `responderID` of `basic` to the issuer or to one of the included certificates.
///
/// Certificates that cannot be parsed are skipped. Only the first certificate matching the
/// responder ID is returned, whether or not it turns out to be authorized.
pub(crate) fn find<'a, T: TrustDomain + ?Sized>(
    trust_domain: &T,
    cert_id: &CertId<'_>,
    basic: &BasicResponse<'a>,
) -> Result<Responder<'a>> {
    let responder_id = basic.responder_id();

    let is_issuer = match responder_id {
        ResponderId::ByName(name) => name == cert_id.issuer,
        ResponderId::ByKey(hash) => {
            key_hash(trust_domain, cert_id.issuer_subject_public_key_info)? == *hash
        }
    };
    if is_issuer {
        trace!("response signed by the issuer");
        return Ok(Responder::Issuer);
    }

    for der in basic.certificates() {
        let cert = match Certificate::from_der(der) {
            Ok(cert) => cert,
            Err(err) => {
                trace!("skipping unusable certificate: {}", err);
                continue;
            }
        };

        let is_match = match responder_id {
            ResponderId::ByName(name) => name == cert.subject,
            ResponderId::ByKey(hash) => {
                match key_hash(trust_domain, cert.subject_public_key_info) {
                    Ok(candidate) => candidate == *hash,
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(_) => false,
                }
            }
        };
        if is_match {
            trace!("response signed by a delegated responder");
            return Ok(Responder::Delegated(cert));
        }
    }

    debug!("no certificate matches the responder ID");
    Err(Error::InvalidSigningCert)
}

/// Check that `cert` may sign OCSP responses about certificates identified by `cert_id` at
/// `time`.
///
/// Every failure is [`Error::InvalidSigningCert`], except for fatal errors from the trust
/// domain.
pub(crate) fn check_delegated_responder<T: TrustDomain + ?Sized>(
    trust_domain: &T,
    cert_id: &CertId<'_>,
    cert: &Certificate<'_>,
    time: Time,
) -> Result<()> {
    if cert.issuer != cert_id.issuer {
        debug!("delegated responder was not issued by the issuer");
        return Err(Error::InvalidSigningCert);
    }

    signed_data::verify(
        trust_domain,
        &cert.signed_data,
        cert_id.issuer_subject_public_key_info,
    )?;

    if !cert.has_ocsp_signing_eku() {
        debug!("delegated responder is not authorized for OCSP signing");
        return Err(Error::InvalidSigningCert);
    }

    if !cert.is_valid_at(time) {
        debug!("delegated responder certificate is not valid at the evaluation time");
        return Err(Error::InvalidSigningCert);
    }

    match trust_domain.get_cert_trust(
        EndEntityOrCa::MustBeEndEntity,
        &CertPolicyId::ANY_POLICY,
        cert.der,
    ) {
        Ok(TrustLevel::TrustAnchor | TrustLevel::InheritsTrust) => Ok(()),
        Ok(TrustLevel::ActivelyDistrusted) => {
            debug!("delegated responder is actively distrusted");
            Err(Error::InvalidSigningCert)
        }
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            debug!("trust lookup for delegated responder failed: {}", err);
            Err(Error::InvalidSigningCert)
        }
    }
}
