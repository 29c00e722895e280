//! Keys, certificates, OCSP responses and a trust domain for building fixtures.
//!
//! WARNING: the keys here are generated from fixed seeds and are only fit for tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use der::asn1::{
    BitStringRef, GeneralizedTime, Null, ObjectIdentifier, OctetString, OctetStringRef, UintRef,
    UtcTime,
};
use der::{AnyRef, Choice, Decode, Encode, Sequence, Tag};
use ocsp_verify::oid::{ID_PKIX_OCSP_BASIC, ID_SHA_1, SHA_256_WITH_RSA_ENCRYPTION};
use ocsp_verify::spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};
use ocsp_verify::{
    crypto, CertId, CertPolicyId, EndEntityOrCa, Result, SignedData, Time, TrustDomain,
    TrustLevel, ONE_DAY_IN_SECONDS, SHA1_DIGEST_LEN,
};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use rsa::pkcs1v15::{self, SigningKey};
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;
use sha2::Sha256;
use signature::{SignatureEncoding, Signer};
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::ext::pkix::{BasicConstraints, ExtendedKeyUsage};
use x509_cert::ext::{Extension, Extensions};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

pub use ocsp_verify::oid::ID_KP_OCSP_SIGNING;

/// Fixed evaluation time, 2023-11-14T22:13:20Z.
pub const NOW: Time = Time::from_unix_secs(1_700_000_000);

pub const ID_KP_SERVER_AUTH: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.1");

pub const SHA256_WITH_RSA: AlgorithmIdentifierRef<'static> = AlgorithmIdentifierRef {
    oid: SHA_256_WITH_RSA_ENCRYPTION,
    parameters: Some(AnyRef::NULL),
};

pub const SHA1: AlgorithmIdentifierRef<'static> = AlgorithmIdentifierRef {
    oid: ID_SHA_1,
    parameters: Some(AnyRef::NULL),
};

pub const SHA256: AlgorithmIdentifierRef<'static> = AlgorithmIdentifierRef {
    oid: ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1"),
    parameters: Some(AnyRef::NULL),
};

pub const END_ENTITY_SERIAL: &[u8] = &[0x01, 0x23];

pub fn before(days: u64) -> Time {
    Time::from_unix_secs(NOW.unix_secs() - days * ONE_DAY_IN_SECONDS)
}

pub fn after(days: u64) -> Time {
    Time::from_unix_secs(NOW.unix_secs() + days * ONE_DAY_IN_SECONDS)
}

//
// DER
//

/// `tag` followed by `value`, for inputs no well-formed structure can express.
pub fn tlv(tag: Tag, value: &[u8]) -> Vec<u8> {
    AnyRef::new(tag, value).unwrap().to_der().unwrap()
}

pub fn oid(oid: ObjectIdentifier) -> Vec<u8> {
    oid.to_der().unwrap()
}

fn to_generalized_time(time: Time) -> GeneralizedTime {
    GeneralizedTime::from_unix_duration(Duration::from_secs(time.unix_secs())).unwrap()
}

pub fn generalized_time(time: Time) -> Vec<u8> {
    to_generalized_time(time).to_der().unwrap()
}

/// `Name` with a single common name.
pub fn cn_name(common_name: &str) -> Vec<u8> {
    Name::from_str(&format!("CN={common_name}"))
        .unwrap()
        .to_der()
        .unwrap()
}

pub fn extension(extn_id: ObjectIdentifier, critical: bool, value: &[u8]) -> Extension {
    Extension {
        extn_id,
        critical,
        extn_value: OctetString::new(value).unwrap(),
    }
}

/// Replace the single occurrence of `from` in `bytes` with `to`.
pub fn tamper_once(bytes: &mut [u8], from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let positions: Vec<usize> = bytes
        .windows(from.len())
        .enumerate()
        .filter(|(_, window)| *window == from)
        .map(|(position, _)| position)
        .collect();
    assert_eq!(positions.len(), 1, "pattern must occur exactly once");
    bytes[positions[0]..positions[0] + to.len()].copy_from_slice(to);
}

//
// Keys
//

pub struct TestKey {
    signing_key: SigningKey<Sha256>,
    subject_public_key_info: Vec<u8>,
}

impl TestKey {
    fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let private_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let subject_public_key_info = private_key
            .to_public_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
            subject_public_key_info,
        }
    }

    pub fn subject_public_key_info(&self) -> &[u8] {
        &self.subject_public_key_info
    }

    /// `sha256WithRSAEncryption` signature over `data`.
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.signing_key.sign(data).to_vec()
    }

    /// SHA-1 of the `subjectPublicKey` BIT STRING contents.
    pub fn key_hash(&self) -> [u8; SHA1_DIGEST_LEN] {
        let spki = SubjectPublicKeyInfoRef::from_der(&self.subject_public_key_info).unwrap();
        crypto::digest_buf(spki.subject_public_key.raw_bytes()).unwrap()
    }
}

macro_rules! test_key {
    ($name:ident, $seed:expr) => {
        pub fn $name() -> &'static TestKey {
            static KEY: OnceLock<TestKey> = OnceLock::new();
            KEY.get_or_init(|| TestKey::generate($seed))
        }
    };
}

test_key!(root_key, 1);
test_key!(signer_key, 2);
test_key!(unknown_key, 3);
test_key!(sub_ca_key, 4);

pub fn root_name() -> Vec<u8> {
    cn_name("Test CA 1")
}

/// `CertId` of the end-entity certificate issued by the root.
pub fn end_entity_cert_id(root_name: &[u8]) -> CertId<'_> {
    CertId::new(
        root_name,
        root_key().subject_public_key_info(),
        END_ENTITY_SERIAL,
    )
}

//
// Certificates
//

pub struct CertificateParams<'a> {
    pub serial_number: u32,
    pub issuer: &'a [u8],
    pub not_before: Time,
    pub not_after: Time,
    pub subject: &'a [u8],
    pub subject_key: &'a TestKey,
    pub ext_key_usage: Option<&'a [ObjectIdentifier]>,
    pub ca: bool,
    pub signer_key: &'a TestKey,
}

fn to_x509_time(time: Time) -> x509_cert::time::Time {
    x509_cert::time::Time::UtcTime(
        UtcTime::from_unix_duration(Duration::from_secs(time.unix_secs())).unwrap(),
    )
}

pub fn create_certificate(params: &CertificateParams<'_>) -> Vec<u8> {
    let profile = Profile::Manual {
        issuer: Some(Name::from_der(params.issuer).unwrap()),
    };
    let validity = Validity {
        not_before: to_x509_time(params.not_before),
        not_after: to_x509_time(params.not_after),
    };
    let subject_public_key_info =
        SubjectPublicKeyInfoOwned::from_der(params.subject_key.subject_public_key_info())
            .unwrap();

    let mut builder = CertificateBuilder::new(
        profile,
        SerialNumber::from(params.serial_number),
        validity,
        Name::from_der(params.subject).unwrap(),
        subject_public_key_info,
        &params.signer_key.signing_key,
    )
    .unwrap();
    if params.ca {
        builder
            .add_extension(&BasicConstraints {
                ca: true,
                path_len_constraint: None,
            })
            .unwrap();
    }
    if let Some(purposes) = params.ext_key_usage {
        builder
            .add_extension(&ExtendedKeyUsage(purposes.to_vec()))
            .unwrap();
    }

    builder
        .build::<pkcs1v15::Signature>()
        .unwrap()
        .to_der()
        .unwrap()
}

/// Delegated responder certificate issued by the root, valid from 1 day before [`NOW`]
/// for 10 days, with the given subject and extended key usage.
pub fn signer_certificate(subject: &[u8], purposes: Option<&[ObjectIdentifier]>) -> Vec<u8> {
    let root_name = root_name();
    create_certificate(&CertificateParams {
        serial_number: 5,
        issuer: &root_name,
        not_before: before(1),
        not_after: after(9),
        subject,
        subject_key: signer_key(),
        ext_key_usage: purposes,
        ca: false,
        signer_key: root_key(),
    })
}

//
// OCSP responses
//

#[derive(Sequence)]
struct OcspResponseAsn1<'a> {
    response_status: AnyRef<'a>,

    #[asn1(context_specific = "0", optional = "true", tag_mode = "EXPLICIT")]
    response_bytes: Option<ResponseBytesAsn1<'a>>,
}

#[derive(Sequence)]
struct ResponseBytesAsn1<'a> {
    response_type: ObjectIdentifier,
    response: OctetStringRef<'a>,
}

#[derive(Sequence)]
struct BasicOcspResponseAsn1<'a> {
    tbs_response_data: ResponseDataAsn1<'a>,
    signature_algorithm: AlgorithmIdentifierRef<'a>,
    signature: BitStringRef<'a>,

    #[asn1(context_specific = "0", optional = "true", tag_mode = "EXPLICIT")]
    certs: Option<Vec<AnyRef<'a>>>,
}

#[derive(Sequence)]
struct ResponseDataAsn1<'a> {
    responder_id: ResponderIdAsn1<'a>,
    produced_at: GeneralizedTime,
    responses: Vec<SingleResponseAsn1<'a>>,

    #[asn1(context_specific = "1", optional = "true", tag_mode = "EXPLICIT")]
    response_extensions: Option<Extensions>,
}

#[derive(Choice)]
enum ResponderIdAsn1<'a> {
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", constructed = "true")]
    ByName(Name),

    #[asn1(context_specific = "2", tag_mode = "EXPLICIT", constructed = "true")]
    ByKey(OctetStringRef<'a>),
}

#[derive(Sequence)]
struct SingleResponseAsn1<'a> {
    cert_id: CertIdAsn1<'a>,
    cert_status: CertStatusAsn1,
    this_update: GeneralizedTime,

    #[asn1(context_specific = "0", optional = "true", tag_mode = "EXPLICIT")]
    next_update: Option<GeneralizedTime>,
}

#[derive(Sequence)]
struct CertIdAsn1<'a> {
    hash_algorithm: AlgorithmIdentifierRef<'a>,
    issuer_name_hash: OctetStringRef<'a>,
    issuer_key_hash: OctetStringRef<'a>,
    serial_number: UintRef<'a>,
}

#[derive(Choice)]
enum CertStatusAsn1 {
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT")]
    Good(Null),

    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", constructed = "true")]
    Revoked(RevokedInfoAsn1),

    #[asn1(context_specific = "2", tag_mode = "IMPLICIT")]
    Unknown(Null),
}

#[derive(Sequence)]
struct RevokedInfoAsn1 {
    revocation_time: GeneralizedTime,
}

#[derive(Clone, Copy, Debug)]
pub enum Status {
    Good,
    Revoked(Time),
    Unknown,
}

#[derive(Clone, Debug)]
pub enum Responder {
    ByName(Vec<u8>),
    ByKey([u8; SHA1_DIGEST_LEN]),
}

pub struct SingleResponseParams {
    pub hash_algorithm: AlgorithmIdentifierRef<'static>,
    pub issuer_name_hash: [u8; SHA1_DIGEST_LEN],
    pub issuer_key_hash: [u8; SHA1_DIGEST_LEN],
    pub serial_number: Vec<u8>,
    pub status: Status,
    pub this_update: Time,
    pub next_update: Option<Time>,
}

impl SingleResponseParams {
    /// Response about the end-entity certificate, thisUpdate 1 day ago, nextUpdate in 1 day.
    pub fn new(status: Status) -> Self {
        Self {
            hash_algorithm: SHA1,
            issuer_name_hash: crypto::digest_buf(&root_name()).unwrap(),
            issuer_key_hash: root_key().key_hash(),
            serial_number: END_ENTITY_SERIAL.to_vec(),
            status,
            this_update: before(1),
            next_update: Some(after(1)),
        }
    }

    fn to_asn1(&self) -> SingleResponseAsn1<'_> {
        let cert_status = match self.status {
            Status::Good => CertStatusAsn1::Good(Null),
            Status::Revoked(time) => CertStatusAsn1::Revoked(RevokedInfoAsn1 {
                revocation_time: to_generalized_time(time),
            }),
            Status::Unknown => CertStatusAsn1::Unknown(Null),
        };
        SingleResponseAsn1 {
            cert_id: CertIdAsn1 {
                hash_algorithm: self.hash_algorithm,
                issuer_name_hash: OctetStringRef::new(&self.issuer_name_hash).unwrap(),
                issuer_key_hash: OctetStringRef::new(&self.issuer_key_hash).unwrap(),
                serial_number: UintRef::new(&self.serial_number).unwrap(),
            },
            cert_status,
            this_update: to_generalized_time(self.this_update),
            next_update: self.next_update.map(to_generalized_time),
        }
    }
}

pub struct ResponseParams<'a> {
    pub response_status: u8,
    pub responder: Responder,
    pub signer_key: &'a TestKey,
    pub produced_at: Time,
    pub responses: Vec<SingleResponseParams>,
    pub response_extensions: Extensions,
    pub certs: Option<Vec<Vec<u8>>>,
}

impl ResponseParams<'static> {
    /// Successful response signed by the root, identified by key, with one single response.
    pub fn new(status: Status) -> Self {
        Self {
            response_status: 0,
            responder: Responder::ByKey(root_key().key_hash()),
            signer_key: root_key(),
            produced_at: NOW,
            responses: vec![SingleResponseParams::new(status)],
            response_extensions: Extensions::new(),
            certs: None,
        }
    }

    /// Successful response signed by [`signer_key`] with the given certificates attached.
    pub fn delegated(responder: Responder, certs: Vec<Vec<u8>>) -> Self {
        Self {
            responder,
            signer_key: signer_key(),
            certs: Some(certs),
            ..Self::new(Status::Good)
        }
    }
}

impl ResponseParams<'_> {
    pub fn encode(&self) -> Vec<u8> {
        let responder_id = match &self.responder {
            Responder::ByName(name) => ResponderIdAsn1::ByName(Name::from_der(name).unwrap()),
            Responder::ByKey(hash) => ResponderIdAsn1::ByKey(OctetStringRef::new(hash).unwrap()),
        };
        let tbs_response_data = ResponseDataAsn1 {
            responder_id,
            produced_at: to_generalized_time(self.produced_at),
            responses: self.responses.iter().map(SingleResponseParams::to_asn1).collect(),
            response_extensions: (!self.response_extensions.is_empty())
                .then(|| self.response_extensions.clone()),
        };
        let signature = self.signer_key.sign(&tbs_response_data.to_der().unwrap());

        let certs = self.certs.as_ref().map(|certs| {
            certs
                .iter()
                .map(|cert| AnyRef::from_der(cert).unwrap())
                .collect()
        });
        let basic = BasicOcspResponseAsn1 {
            tbs_response_data,
            signature_algorithm: SHA256_WITH_RSA,
            signature: BitStringRef::from_bytes(&signature).unwrap(),
            certs,
        }
        .to_der()
        .unwrap();

        let status = [self.response_status];
        OcspResponseAsn1 {
            response_status: AnyRef::new(Tag::Enumerated, &status).unwrap(),
            response_bytes: Some(ResponseBytesAsn1 {
                response_type: ID_PKIX_OCSP_BASIC,
                response: OctetStringRef::new(&basic).unwrap(),
            }),
        }
        .to_der()
        .unwrap()
    }
}

/// `OCSPResponse` with `status` and no `responseBytes`.
pub fn bare_response(status: u8) -> Vec<u8> {
    let status = [status];
    OcspResponseAsn1 {
        response_status: AnyRef::new(Tag::Enumerated, &status).unwrap(),
        response_bytes: None,
    }
    .to_der()
    .unwrap()
}

//
// Trust domain
//

/// Trust domain backed by [`ocsp_verify::crypto`], answering trust queries with a fixed result
/// and counting the calls made to it.
pub struct TestTrustDomain {
    pub trust: Result<TrustLevel>,
    /// When set, the only certificate whose trust may be queried.
    pub expected_cert: Option<Vec<u8>>,
    pub trust_queries: Cell<usize>,
    pub signature_checks: Cell<usize>,
}

impl TestTrustDomain {
    pub fn new() -> Self {
        Self::with_trust_level(TrustLevel::InheritsTrust)
    }

    pub fn with_trust_level(trust_level: TrustLevel) -> Self {
        Self::with_trust(Ok(trust_level))
    }

    pub fn with_trust(trust: Result<TrustLevel>) -> Self {
        Self {
            trust,
            expected_cert: None,
            trust_queries: Cell::new(0),
            signature_checks: Cell::new(0),
        }
    }

    pub fn expecting(cert: &[u8]) -> Self {
        Self {
            expected_cert: Some(cert.to_vec()),
            ..Self::new()
        }
    }
}

impl TrustDomain for TestTrustDomain {
    fn get_cert_trust(
        &self,
        role: EndEntityOrCa,
        policy: &CertPolicyId,
        candidate_cert: &[u8],
    ) -> Result<TrustLevel> {
        assert_eq!(role, EndEntityOrCa::MustBeEndEntity);
        assert!(policy.is_any_policy());
        if let Some(expected) = &self.expected_cert {
            assert_eq!(candidate_cert, expected.as_slice());
        }
        self.trust_queries.set(self.trust_queries.get() + 1);
        self.trust
    }

    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()> {
        self.signature_checks.set(self.signature_checks.get() + 1);
        crypto::verify_signed_data(signed_data, subject_public_key_info)
    }

    fn digest_buf(&self, item: &[u8]) -> Result<[u8; SHA1_DIGEST_LEN]> {
        crypto::digest_buf(item)
    }

    fn check_public_key(&self, subject_public_key_info: &[u8]) -> Result<()> {
        crypto::check_public_key(subject_public_key_info)
    }
}
