//! Borrowed view of an X.509 certificate.
//!
//! Only what delegated responder authorization needs is extracted: names, key, validity
//! and the extended key usage extension. Nothing is copied.

use crate::errors::{Error, Result};
use crate::oid::{is_recognized_cert_extension, ID_CE_EXT_KEY_USAGE, ID_KP_OCSP_SIGNING};
use crate::signed_data;
use crate::time::Time;
use crate::tlv::{self, explicit, implicit_primitive, Elements, Reader};
use crate::trust::SignedData;
use der::asn1::{GeneralizedTime, UtcTime};
use der::{Decode, Tag, TagNumber};

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Version {
    V1,
    V2,
    V3,
}

/// A parsed certificate borrowing from its DER encoding.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Certificate<'a> {
    /// The complete encoding.
    pub der: &'a [u8],
    /// `tbsCertificate`, `signatureAlgorithm` and `signature`.
    pub signed_data: SignedData<'a>,
    pub issuer: &'a [u8],
    pub subject: &'a [u8],
    pub subject_public_key_info: &'a [u8],
    pub not_before: Time,
    pub not_after: Time,
    /// Value of the extended key usage extension, if present.
    pub ext_key_usage: Option<&'a [u8]>,
}

impl<'a> Certificate<'a> {
    pub fn from_der(der: &'a [u8]) -> Result<Self> {
        let (tbs, algorithm, signature) = tlv::parse_all(der, |r| {
            r.nested(Tag::Sequence, |r| {
                let tbs = r.expect_tlv(Tag::Sequence)?;
                let algorithm = r.expect_tlv(Tag::Sequence)?;
                let signature = r.expect_tlv(Tag::BitString)?;
                Ok((tbs, algorithm, signature))
            })
        })?;
        let signed_data = signed_data::from_components(tbs, algorithm, signature)?;

        tlv::parse_all(tbs, |r| {
            r.nested(Tag::Sequence, |r| {
                let version = r
                    .optional_nested(explicit(TagNumber::N0), |r| r.expect(Tag::Integer))?
                    .map_or(Ok(Version::V1), |value| match value {
                        [0] => Ok(Version::V1),
                        [1] => Ok(Version::V2),
                        [2] => Ok(Version::V3),
                        _ => Err(Error::BadDer),
                    })?;
                let _serial_number = r.expect(Tag::Integer)?;

                // The inner and outer algorithm identifiers must agree byte for byte.
                if r.expect_tlv(Tag::Sequence)? != algorithm {
                    return Err(Error::BadDer);
                }

                let issuer = r.expect_tlv(Tag::Sequence)?;
                let (not_before, not_after) =
                    r.nested(Tag::Sequence, |r| Ok((read_time(r)?, read_time(r)?)))?;
                let subject = r.expect_tlv(Tag::Sequence)?;
                let subject_public_key_info = r.expect_tlv(Tag::Sequence)?;

                if version >= Version::V2 {
                    // issuerUniqueID, subjectUniqueID
                    r.optional(implicit_primitive(TagNumber::N1))?;
                    r.optional(implicit_primitive(TagNumber::N2))?;
                }

                let ext_key_usage = if version == Version::V3 {
                    r.optional_nested(explicit(TagNumber::N3), read_extensions)?
                        .flatten()
                } else {
                    None
                };

                Ok(Self {
                    der,
                    signed_data,
                    issuer,
                    subject,
                    subject_public_key_info,
                    not_before,
                    not_after,
                    ext_key_usage,
                })
            })
        })
    }

    /// Is `time` within `[notBefore, notAfter]`?
    pub fn is_valid_at(&self, time: Time) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    /// Does the certificate carry an extended key usage extension listing `id-kp-OCSPSigning`?
    ///
    /// `anyExtendedKeyUsage` does not count.
    pub fn has_ocsp_signing_eku(&self) -> bool {
        let Some(value) = self.ext_key_usage else {
            return false;
        };
        let purposes = tlv::parse_all(value, |r| r.expect(Tag::Sequence))
            .and_then(|body| Elements::new(body, Tag::ObjectIdentifier));

        match purposes {
            Ok(purposes) => purposes.into_iter().any(|purpose| {
                matches!(purpose, Ok(encoded) if is_ocsp_signing(encoded))
            }),
            Err(_) => false,
        }
    }
}

fn is_ocsp_signing(encoded_oid: &[u8]) -> bool {
    tlv::parse_all(encoded_oid, |r| r.expect(Tag::ObjectIdentifier))
        .map(|value| value == ID_KP_OCSP_SIGNING.as_bytes())
        .unwrap_or(false)
}

/// `Time ::= CHOICE { utcTime UTCTime, generalTime GeneralizedTime }`
fn read_time(r: &mut Reader<'_>) -> Result<Time> {
    if r.peek(Tag::UtcTime) {
        Ok(UtcTime::from_der(r.expect_tlv(Tag::UtcTime)?)?.into())
    } else {
        Ok(GeneralizedTime::from_der(r.expect_tlv(Tag::GeneralizedTime)?)?.into())
    }
}

/// `Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension`, returning the extended key usage value.
fn read_extensions<'a>(r: &mut Reader<'a>) -> Result<Option<&'a [u8]>> {
    r.nested(Tag::Sequence, |r| {
        if r.at_end() {
            return Err(Error::BadDer);
        }

        let mut ext_key_usage = None;
        while !r.at_end() {
            r.nested(Tag::Sequence, |r| {
                let oid = r.expect(Tag::ObjectIdentifier)?;
                let critical = read_critical(r)?;
                let value = r.expect(Tag::OctetString)?;

                if oid == ID_CE_EXT_KEY_USAGE.as_bytes() {
                    if ext_key_usage.replace(value).is_some() {
                        return Err(Error::BadDer);
                    }
                } else if critical && !is_recognized_cert_extension(oid) {
                    return Err(Error::UnknownCriticalExtension);
                }
                Ok(())
            })?;
        }
        Ok(ext_key_usage)
    })
}

/// `critical BOOLEAN DEFAULT FALSE`
pub(crate) fn read_critical(r: &mut Reader<'_>) -> Result<bool> {
    match r.optional(Tag::Boolean)? {
        None => Ok(false),
        Some([0xff]) => Ok(true),
        // Explicitly encoded FALSE is not DER, but widely produced.
        Some([0x00]) => Ok(false),
        Some(_) => Err(Error::BadDer),
    }
}
