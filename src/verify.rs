//! Verification entry point.

use crate::cert_id::CertId;
use crate::errors::{Error, Result};
use crate::responder::{self, Responder};
use crate::response::OcspResponse;
use crate::signed_data;
use crate::status;
use crate::time::Time;
use crate::trust::TrustDomain;
use log::debug;

/// Outcome of verifying an OCSP response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub struct Outcome {
    result: Result<()>,
    expired: bool,
}

impl Outcome {
    /// `Ok` when the response is authentic and says the certificate is good.
    pub fn result(&self) -> Result<()> {
        self.result
    }

    /// Was the matched single response outside its validity window?
    ///
    /// Only set once a single response about the certificate has been found in an authentic
    /// response; `false` whenever verification failed before that point.
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

/// Verify `encoded_response`, a DER `OCSPResponse`, as a statement about `cert_id` at `time`.
///
/// The response must be signed by the certificate's issuer, or by a certificate the issuer
/// issued with the `id-kp-OCSPSigning` extended key usage that is valid at `time` and not
/// distrusted by `trust_domain`. The first single response about `cert_id` decides the result.
///
/// Staleness is reported separately through [`Outcome::is_expired`]: a response whose
/// `thisUpdate` is after `time`, or whose `nextUpdate` (or `thisUpdate` plus
/// `max_lifetime_in_days` when `nextUpdate` is absent) is before `time`, still yields its
/// status.
pub fn verify_encoded_ocsp_response<T: TrustDomain + ?Sized>(
    trust_domain: &T,
    cert_id: &CertId<'_>,
    time: Time,
    max_lifetime_in_days: u16,
    encoded_response: &[u8],
) -> Outcome {
    let mut expired = false;
    let result = verify(
        trust_domain,
        cert_id,
        time,
        max_lifetime_in_days,
        encoded_response,
        &mut expired,
    );
    Outcome { result, expired }
}

fn verify<T: TrustDomain + ?Sized>(
    trust_domain: &T,
    cert_id: &CertId<'_>,
    time: Time,
    max_lifetime_in_days: u16,
    encoded_response: &[u8],
    expired: &mut bool,
) -> Result<()> {
    let response = OcspResponse::from_der(encoded_response)?;
    response.status().check()?;
    let basic = response.basic().ok_or(Error::MalformedResponse)?;

    let responder = responder::find(trust_domain, cert_id, basic)?;
    let subject_public_key_info = match &responder {
        Responder::Issuer => cert_id.issuer_subject_public_key_info,
        Responder::Delegated(cert) => {
            responder::check_delegated_responder(trust_domain, cert_id, cert, time)?;
            cert.subject_public_key_info
        }
    };
    signed_data::verify(trust_domain, basic.signed_data(), subject_public_key_info)?;

    let single = status::find_match(trust_domain, cert_id, basic)?.ok_or_else(|| {
        debug!("no single response about the certificate");
        Error::UnknownCert
    })?;

    *expired = status::is_stale(&single, time, max_lifetime_in_days);
    if *expired {
        debug!("response is outside its validity window");
    }

    status::check(single.cert_status)
}
