//! Error types.

/// Alias for [`core::result::Result`] with the `ocsp-verify` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Caller-supplied DER (issuer name, issuer key, certificate) could not be decoded.
    BadDer,

    /// The response is not a well-formed `OCSPResponse`.
    MalformedResponse,

    /// The responder answered `malformedRequest`.
    MalformedRequest,

    /// The responder answered `internalError`.
    ServerError,

    /// The responder answered `tryLater`.
    TryServerLater,

    /// The responder answered `sigRequired`.
    RequestNeedsSig,

    /// The responder answered `unauthorized`.
    UnauthorizedRequest,

    /// The `responseStatus` value is not one RFC 6960 defines.
    UnknownResponseStatus,

    /// The responder is not authorized to sign for the issuer, or its signature is invalid.
    InvalidSigningCert,

    /// The response says nothing about the certificate, or says its status is unknown.
    UnknownCert,

    /// The certificate is revoked.
    RevokedCertificate,

    /// The response carries a critical extension.
    UnknownCriticalExtension,

    /// Signature did not verify.
    BadSignature,

    /// Signature or key algorithm is not supported.
    UnsupportedAlgorithm,

    /// Public key is malformed or too small.
    InvalidKey,

    /// The trust capability failed in a way that must abort verification.
    LibraryFailure,
}

impl Error {
    /// Is this an error which aborts verification rather than describing the response?
    ///
    /// Fatal errors raised by a [`TrustDomain`][crate::TrustDomain] are returned unchanged
    /// instead of being folded into [`Error::InvalidSigningCert`].
    pub fn is_fatal(self) -> bool {
        matches!(self, Error::LibraryFailure)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BadDer => write!(f, "bad DER encoding"),
            Error::MalformedResponse => write!(f, "malformed OCSP response"),
            Error::MalformedRequest => write!(f, "OCSP responder reported a malformed request"),
            Error::ServerError => write!(f, "OCSP responder reported an internal error"),
            Error::TryServerLater => write!(f, "OCSP responder asked to try later"),
            Error::RequestNeedsSig => write!(f, "OCSP responder requires a signed request"),
            Error::UnauthorizedRequest => {
                write!(f, "OCSP responder rejected the request as unauthorized")
            }
            Error::UnknownResponseStatus => write!(f, "unknown OCSP response status"),
            Error::InvalidSigningCert => write!(f, "invalid OCSP signing certificate"),
            Error::UnknownCert => write!(f, "OCSP responder does not know the certificate"),
            Error::RevokedCertificate => write!(f, "certificate is revoked"),
            Error::UnknownCriticalExtension => write!(f, "unsupported critical extension"),
            Error::BadSignature => write!(f, "signature verification failed"),
            Error::UnsupportedAlgorithm => write!(f, "unsupported algorithm"),
            Error::InvalidKey => write!(f, "invalid public key"),
            Error::LibraryFailure => write!(f, "trust domain failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<der::Error> for Error {
    fn from(_err: der::Error) -> Error {
        Error::BadDer
    }
}

impl From<spki::Error> for Error {
    fn from(_err: spki::Error) -> Error {
        Error::BadDer
    }
}

#[cfg(feature = "rustcrypto")]
impl From<signature::Error> for Error {
    fn from(_err: signature::Error) -> Error {
        Error::BadSignature
    }
}
