//! Matching single responses against the queried certificate, and evaluating what they say.

use crate::cert_id::{key_hash, CertId};
use crate::errors::{Error, Result};
use crate::oid::ID_SHA_1;
use crate::response::{BasicResponse, CertStatus, ResponseCertId, SingleResponse};
use crate::time::Time;
use crate::trust::{TrustDomain, SHA1_DIGEST_LEN};
use der::asn1::AnyRef;
use log::trace;

/// The first single response about `cert_id`, if any.
///
/// Only SHA-1 `CertID`s can match; entries using another hash algorithm are skipped.
pub(crate) fn find_match<'a, T: TrustDomain + ?Sized>(
    trust_domain: &T,
    cert_id: &CertId<'_>,
    basic: &BasicResponse<'a>,
) -> Result<Option<SingleResponse<'a>>> {
    let issuer_name_hash = trust_domain.digest_buf(cert_id.issuer)?;
    let issuer_key_hash = key_hash(trust_domain, cert_id.issuer_subject_public_key_info)?;

    for single in basic.single_responses() {
        let single = single?;
        if matches(
            &single.cert_id,
            &issuer_name_hash,
            &issuer_key_hash,
            cert_id.serial_number,
        ) {
            return Ok(Some(single));
        }
        trace!("skipping single response about another certificate");
    }
    Ok(None)
}

fn matches(
    candidate: &ResponseCertId<'_>,
    issuer_name_hash: &[u8; SHA1_DIGEST_LEN],
    issuer_key_hash: &[u8; SHA1_DIGEST_LEN],
    serial_number: &[u8],
) -> bool {
    let is_sha1 = candidate.hash_algorithm.oid == ID_SHA_1
        && candidate
            .hash_algorithm
            .parameters
            .map_or(true, |parameters| parameters == AnyRef::NULL);

    is_sha1
        && candidate.issuer_name_hash == issuer_name_hash
        && candidate.issuer_key_hash == issuer_key_hash
        && candidate.serial_number == serial_number
}

/// Is `single` outside its validity window at `time`?
///
/// The window runs from `thisUpdate` to `nextUpdate`, or to `thisUpdate` plus
/// `max_lifetime_in_days` when the responder gave no `nextUpdate`.
pub(crate) fn is_stale(single: &SingleResponse<'_>, time: Time, max_lifetime_in_days: u16) -> bool {
    let end = single
        .next_update
        .unwrap_or_else(|| single.this_update.saturating_add_days(max_lifetime_in_days));

    time < single.this_update || time > end
}

/// Result of the call for a matched `certStatus`.
pub(crate) fn check(cert_status: CertStatus) -> Result<()> {
    match cert_status {
        CertStatus::Good => Ok(()),
        CertStatus::Revoked { .. } => Err(Error::RevokedCertificate),
        CertStatus::Unknown => Err(Error::UnknownCert),
    }
}
