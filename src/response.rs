//! Parsing of DER-encoded `OCSPResponse` structures (RFC 6960 section 4.2.1).
//!
//! ```text
//! OCSPResponse ::= SEQUENCE {
//!    responseStatus         OCSPResponseStatus,
//!    responseBytes          [0] EXPLICIT ResponseBytes OPTIONAL }
//!
//! ResponseBytes ::= SEQUENCE {
//!    responseType   OBJECT IDENTIFIER,
//!    response       OCTET STRING }
//!
//! BasicOCSPResponse ::= SEQUENCE {
//!    tbsResponseData      ResponseData,
//!    signatureAlgorithm   AlgorithmIdentifier,
//!    signature            BIT STRING,
//!    certs            [0] EXPLICIT SEQUENCE OF Certificate OPTIONAL }
//! ```
//!
//! The parser is strict: every element is checked for its tag, its length and the absence of
//! trailing data, and every single response and certificate framing is validated up front so
//! the accessors never encounter malformed data later.

use crate::cert::read_critical;
use crate::errors::{Error, Result};
use crate::oid::ID_PKIX_OCSP_BASIC;
use crate::signed_data;
use crate::time::Time;
use crate::tlv::{self, explicit, implicit_primitive, Elements, Reader};
use crate::trust::{SignedData, SHA1_DIGEST_LEN};
use der::asn1::GeneralizedTime;
use der::{Decode, Tag, TagNumber};
use spki::AlgorithmIdentifierRef;

/// `OCSPResponseStatus`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResponseStatus {
    /// `successful (0)`: the response has valid confirmations.
    Successful,

    /// `malformedRequest (1)`: illegal confirmation request.
    MalformedRequest,

    /// `internalError (2)`: internal error in issuer.
    InternalError,

    /// `tryLater (3)`: try again later.
    TryLater,

    /// `sigRequired (5)`: must sign the request.
    SigRequired,

    /// `unauthorized (6)`: request unauthorized.
    Unauthorized,

    /// `4`, which RFC 6960 leaves unused, or any value it does not define.
    Other(u8),
}

impl ResponseStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Successful,
            1 => Self::MalformedRequest,
            2 => Self::InternalError,
            3 => Self::TryLater,
            5 => Self::SigRequired,
            6 => Self::Unauthorized,
            other => Self::Other(other),
        }
    }

    /// `Ok` for [`ResponseStatus::Successful`], otherwise the error the status maps to.
    pub fn check(self) -> Result<()> {
        match self {
            Self::Successful => Ok(()),
            Self::MalformedRequest => Err(Error::MalformedRequest),
            Self::InternalError => Err(Error::ServerError),
            Self::TryLater => Err(Error::TryServerLater),
            Self::SigRequired => Err(Error::RequestNeedsSig),
            Self::Unauthorized => Err(Error::UnauthorizedRequest),
            Self::Other(_) => Err(Error::UnknownResponseStatus),
        }
    }
}

/// A parsed `OCSPResponse`.
#[derive(Clone, Copy, Debug)]
pub struct OcspResponse<'a> {
    status: ResponseStatus,
    basic: Option<BasicResponse<'a>>,
}

impl<'a> OcspResponse<'a> {
    /// Parse `input`, which must hold exactly one DER `OCSPResponse`.
    ///
    /// When the status is not `successful` the remainder of the response is not interpreted:
    /// the status alone determines the outcome. Structural problems are reported as
    /// [`Error::MalformedResponse`]; critical extensions as [`Error::UnknownCriticalExtension`].
    pub fn from_der(input: &'a [u8]) -> Result<Self> {
        tlv::parse_all(input, |r| r.nested(Tag::Sequence, parse_ocsp_response)).map_err(|err| {
            match err {
                Error::UnknownCriticalExtension => err,
                _ => Error::MalformedResponse,
            }
        })
    }

    /// `responseStatus`.
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// The `BasicOCSPResponse`, present exactly when the status is `successful`.
    pub fn basic(&self) -> Option<&BasicResponse<'a>> {
        self.basic.as_ref()
    }
}

fn parse_ocsp_response<'a>(r: &mut Reader<'a>) -> Result<OcspResponse<'a>> {
    let status = match r.expect(Tag::Enumerated)? {
        [value] => ResponseStatus::from_u8(*value),
        _ => return Err(Error::MalformedResponse),
    };

    if status != ResponseStatus::Successful {
        r.skip_rest()?;
        return Ok(OcspResponse {
            status,
            basic: None,
        });
    }

    let basic = r.nested(explicit(TagNumber::N0), |r| {
        r.nested(Tag::Sequence, |r| {
            if r.expect(Tag::ObjectIdentifier)? != ID_PKIX_OCSP_BASIC.as_bytes() {
                return Err(Error::MalformedResponse);
            }
            let response = r.expect(Tag::OctetString)?;
            tlv::parse_all(response, |r| r.nested(Tag::Sequence, BasicResponse::parse))
        })
    })?;

    Ok(OcspResponse {
        status,
        basic: Some(basic),
    })
}

/// `ResponderID`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponderId<'a> {
    /// `byName`: the DER encoding of the responder's `Name`.
    ByName(&'a [u8]),

    /// `byKey`: SHA-1 of the responder's `subjectPublicKey` BIT STRING contents.
    ByKey(&'a [u8; SHA1_DIGEST_LEN]),
}

/// A parsed `BasicOCSPResponse`.
#[derive(Clone, Copy, Debug)]
pub struct BasicResponse<'a> {
    signed_data: SignedData<'a>,
    responder_id: ResponderId<'a>,
    produced_at: Time,
    responses: &'a [u8],
    certs: &'a [u8],
}

impl<'a> BasicResponse<'a> {
    fn parse(r: &mut Reader<'a>) -> Result<Self> {
        let tbs = r.expect_tlv(Tag::Sequence)?;
        let algorithm = r.expect_tlv(Tag::Sequence)?;
        let signature = r.expect_tlv(Tag::BitString)?;
        let certs = r
            .optional_nested(explicit(TagNumber::N0), |r| r.expect(Tag::Sequence))?
            .unwrap_or_default();
        for cert in Elements::new(certs, Tag::Sequence)? {
            cert?;
        }

        let signed_data = signed_data::from_components(tbs, algorithm, signature)?;

        let (responder_id, produced_at, responses) =
            tlv::parse_all(tbs, |r| r.nested(Tag::Sequence, parse_response_data))?;

        Ok(Self {
            signed_data,
            responder_id,
            produced_at,
            responses,
            certs,
        })
    }

    /// `tbsResponseData` with the response's signature algorithm and signature.
    pub fn signed_data(&self) -> &SignedData<'a> {
        &self.signed_data
    }

    /// `responderID`.
    pub fn responder_id(&self) -> ResponderId<'a> {
        self.responder_id
    }

    /// `producedAt`.
    pub fn produced_at(&self) -> Time {
        self.produced_at
    }

    /// `responses`, in order.
    pub fn single_responses(&self) -> impl Iterator<Item = Result<SingleResponse<'a>>> + 'a {
        Elements::new(self.responses, Tag::Sequence)
            .into_iter()
            .flatten()
            .map(|encoded| encoded.and_then(SingleResponse::from_der))
    }

    /// DER encodings of the certificates in `certs`, in order. Empty when `certs` is absent.
    ///
    /// Only the outer framing of each certificate has been checked.
    pub fn certificates(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        Elements::new(self.certs, Tag::Sequence)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
    }
}

/// ```text
/// ResponseData ::= SEQUENCE {
///    version              [0] EXPLICIT Version DEFAULT v1,
///    responderID              ResponderID,
///    producedAt               GeneralizedTime,
///    responses                SEQUENCE OF SingleResponse,
///    responseExtensions   [1] EXPLICIT Extensions OPTIONAL }
/// ```
fn parse_response_data<'a>(r: &mut Reader<'a>) -> Result<(ResponderId<'a>, Time, &'a [u8])> {
    if let Some(version) = r.optional_nested(explicit(TagNumber::N0), |r| r.expect(Tag::Integer))? {
        if version != [0] {
            return Err(Error::MalformedResponse);
        }
    }

    let responder_id = if let Some(name) =
        r.optional_nested(explicit(TagNumber::N1), |r| r.expect_tlv(Tag::Sequence))?
    {
        ResponderId::ByName(name)
    } else {
        let key_hash = r.nested(explicit(TagNumber::N2), |r| r.expect(Tag::OctetString))?;
        ResponderId::ByKey(key_hash.try_into().map_err(|_| Error::MalformedResponse)?)
    };

    let produced_at = read_generalized_time(r)?;

    let responses = r.expect(Tag::Sequence)?;
    if responses.is_empty() {
        return Err(Error::MalformedResponse);
    }
    for single in Elements::new(responses, Tag::Sequence)? {
        SingleResponse::from_der(single?)?;
    }

    r.optional_nested(explicit(TagNumber::N1), check_extensions)?;

    Ok((responder_id, produced_at, responses))
}

/// `CertID` as carried in a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResponseCertId<'a> {
    /// `hashAlgorithm`.
    pub hash_algorithm: AlgorithmIdentifierRef<'a>,

    /// `issuerNameHash`.
    pub issuer_name_hash: &'a [u8],

    /// `issuerKeyHash`.
    pub issuer_key_hash: &'a [u8],

    /// Contents octets of `serialNumber`.
    pub serial_number: &'a [u8],
}

/// `CRLReason` (RFC 5280 section 5.3.1).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RevocationReason {
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

impl TryFrom<u8> for RevocationReason {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::Unspecified,
            1 => Self::KeyCompromise,
            2 => Self::CaCompromise,
            3 => Self::AffiliationChanged,
            4 => Self::Superseded,
            5 => Self::CessationOfOperation,
            6 => Self::CertificateHold,
            8 => Self::RemoveFromCrl,
            9 => Self::PrivilegeWithdrawn,
            10 => Self::AaCompromise,
            _ => return Err(Error::MalformedResponse),
        })
    }
}

/// `CertStatus`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertStatus {
    /// `good`.
    Good,

    /// `revoked`.
    Revoked {
        /// `revocationTime`.
        revocation_time: Time,

        /// `revocationReason`, if given.
        reason: Option<RevocationReason>,
    },

    /// `unknown`.
    Unknown,
}

/// A parsed `SingleResponse`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SingleResponse<'a> {
    /// `certID`.
    pub cert_id: ResponseCertId<'a>,

    /// `certStatus`.
    pub cert_status: CertStatus,

    /// `thisUpdate`.
    pub this_update: Time,

    /// `nextUpdate`, if given. Never earlier than `this_update`.
    pub next_update: Option<Time>,
}

impl<'a> SingleResponse<'a> {
    /// ```text
    /// SingleResponse ::= SEQUENCE {
    ///    certID                       CertID,
    ///    certStatus                   CertStatus,
    ///    thisUpdate                   GeneralizedTime,
    ///    nextUpdate         [0]       EXPLICIT GeneralizedTime OPTIONAL,
    ///    singleExtensions   [1]       EXPLICIT Extensions OPTIONAL }
    /// ```
    fn from_der(input: &'a [u8]) -> Result<Self> {
        tlv::parse_all(input, |r| {
            r.nested(Tag::Sequence, |r| {
                let cert_id = r.nested(Tag::Sequence, |r| {
                    Ok(ResponseCertId {
                        hash_algorithm: AlgorithmIdentifierRef::from_der(
                            r.expect_tlv(Tag::Sequence)?,
                        )?,
                        issuer_name_hash: r.expect(Tag::OctetString)?,
                        issuer_key_hash: r.expect(Tag::OctetString)?,
                        serial_number: r.expect(Tag::Integer)?,
                    })
                })?;

                let cert_status = read_cert_status(r)?;
                let this_update = read_generalized_time(r)?;
                let next_update =
                    r.optional_nested(explicit(TagNumber::N0), read_generalized_time)?;
                if matches!(next_update, Some(next_update) if next_update < this_update) {
                    return Err(Error::MalformedResponse);
                }

                r.optional_nested(explicit(TagNumber::N1), check_extensions)?;

                Ok(Self {
                    cert_id,
                    cert_status,
                    this_update,
                    next_update,
                })
            })
        })
    }
}

/// ```text
/// CertStatus ::= CHOICE {
///    good        [0]     IMPLICIT NULL,
///    revoked     [1]     IMPLICIT RevokedInfo,
///    unknown     [2]     IMPLICIT UnknownInfo }
///
/// RevokedInfo ::= SEQUENCE {
///    revocationTime              GeneralizedTime,
///    revocationReason    [0]     EXPLICIT CRLReason OPTIONAL }
/// ```
fn read_cert_status(r: &mut Reader<'_>) -> Result<CertStatus> {
    let good = implicit_primitive(TagNumber::N0);
    let unknown = implicit_primitive(TagNumber::N2);

    if r.peek(good) {
        null_value(r.expect(good)?).map(|()| CertStatus::Good)
    } else if r.peek(unknown) {
        null_value(r.expect(unknown)?).map(|()| CertStatus::Unknown)
    } else {
        r.nested(explicit(TagNumber::N1), |r| {
            let revocation_time = read_generalized_time(r)?;
            let reason = r.optional_nested(explicit(TagNumber::N0), |r| {
                match r.expect(Tag::Enumerated)? {
                    [value] => RevocationReason::try_from(*value),
                    _ => Err(Error::MalformedResponse),
                }
            })?;
            Ok(CertStatus::Revoked {
                revocation_time,
                reason,
            })
        })
    }
}

fn null_value(value: &[u8]) -> Result<()> {
    if value.is_empty() {
        Ok(())
    } else {
        Err(Error::MalformedResponse)
    }
}

fn read_generalized_time(r: &mut Reader<'_>) -> Result<Time> {
    Ok(GeneralizedTime::from_der(r.expect_tlv(Tag::GeneralizedTime)?)?.into())
}

/// `Extensions` in a response or single response: none are understood, so any critical one
/// is rejected.
fn check_extensions(r: &mut Reader<'_>) -> Result<()> {
    r.nested(Tag::Sequence, |r| {
        if r.at_end() {
            return Err(Error::MalformedResponse);
        }
        while !r.at_end() {
            r.nested(Tag::Sequence, |r| {
                r.expect(Tag::ObjectIdentifier)?;
                let critical = read_critical(r)?;
                r.expect(Tag::OctetString)?;
                if critical {
                    return Err(Error::UnknownCriticalExtension);
                }
                Ok(())
            })?;
        }
        Ok(())
    })
}
