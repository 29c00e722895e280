#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Usage
//!
//! Implement [`TrustDomain`] for the trust store of the embedding application, describe the
//! certificate being checked with a [`CertId`], and pass the DER response fetched from the
//! responder to [`verify_encoded_ocsp_response`]:
//!
//! ```ignore
//! use ocsp_verify::{verify_encoded_ocsp_response, CertId, Error, Time};
//!
//! let cert_id = CertId::new(issuer_name_der, issuer_spki_der, serial_number);
//! let outcome = verify_encoded_ocsp_response(&trust_domain, &cert_id, Time::now(), 10, &response);
//!
//! match outcome.result() {
//!     Ok(()) if outcome.is_expired() => { /* good, but stale: fetch a new response */ }
//!     Ok(()) => { /* good */ }
//!     Err(Error::RevokedCertificate) => { /* revoked */ }
//!     Err(err) => { /* unknown, or the response cannot be trusted */ }
//! }
//! ```
//!
//! With the default `rustcrypto` feature, the [`crypto`] module provides RSA PKCS#1 v1.5
//! signature verification, SHA-1 and key checks that a [`TrustDomain`] can delegate to.

#[cfg(doctest)]
pub struct ReadmeDoctests;

#[cfg(feature = "std")]
extern crate std;

pub use const_oid;
pub use der;
pub use spki;

mod cert;
mod cert_id;
pub mod errors;
pub mod oid;
mod responder;
pub mod response;
mod signed_data;
mod status;
mod time;
mod tlv;
mod trust;
mod verify;

#[cfg(feature = "rustcrypto")]
pub mod crypto;

pub use crate::{
    cert_id::CertId,
    errors::{Error, Result},
    response::{CertStatus, OcspResponse, ResponseStatus, RevocationReason},
    time::{Time, ONE_DAY_IN_SECONDS},
    trust::{CertPolicyId, EndEntityOrCa, SignedData, TrustDomain, TrustLevel, SHA1_DIGEST_LEN},
    verify::{verify_encoded_ocsp_response, Outcome},
};
