//! Core types for the PAST token format.
//!
//! A PAST token is a string of dot-separated base64url segments:
//! `header.purpose.payload[.footer]`. This crate holds everything the
//! decode front-end and the per-version protocol crates share: the error
//! taxonomy, capability-tagged [`key::Key`] material, the
//! [`purpose::Purpose`] binding table, pre-authentication encoding,
//! wire-framing helpers, and the [`version::Protocol`] contract.
//!
//! The parser itself lives in the `past` crate; the cryptography lives in
//! `past-v1` and `past-v2`.

pub mod claims;
pub mod key;
pub mod pae;
pub mod purpose;
pub mod version;
pub mod wire;

use crate::key::Capability;

/// Error returned for all PAST parsing and configuration operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum PastError {
    /// The token has fewer than three segments, or a segment was not valid
    /// base64url.
    TruncatedOrInvalid,
    /// The token's version header is not in the allow-list, or no protocol
    /// is registered for it.
    UnsupportedVersion,
    /// A purpose is pinned and the token (or a configuration change)
    /// disagrees with it.
    DisallowedPurpose,
    /// The configured key's capability does not match the required one.
    InvalidKeyType {
        /// The capability the purpose requires.
        expected: Capability,
        /// The capability of the key actually held, if any.
        actual: Option<Capability>,
    },
    /// The purpose string is not one of the known tags, or a binding check
    /// was requested with no purpose or key to validate against.
    UnknownPurpose,
    /// The cryptographic verification, decryption, or signature check
    /// failed. The cause is carried for diagnostics only.
    VerificationFailed(ProtocolError),
    /// The verified payload decoded, but not to a JSON object.
    NotAJsonToken,
    /// No protocol operation produced a decoded payload.
    UnsupportedPurposeOrVersion,
}

impl std::error::Error for PastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PastError::VerificationFailed(cause) => Some(cause),
            _ => None,
        }
    }
}

impl std::fmt::Display for PastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PastError::TruncatedOrInvalid => {
                f.write_str("the token is truncated or not valid base64url")
            }
            PastError::UnsupportedVersion => {
                f.write_str("the token version is not supported by this parser")
            }
            PastError::DisallowedPurpose => {
                f.write_str("the purpose is not permitted by the parser configuration")
            }
            PastError::InvalidKeyType {
                expected,
                actual: Some(actual),
            } => {
                write!(f, "invalid key type: expected a {expected} key, got a {actual} key")
            }
            PastError::InvalidKeyType {
                expected,
                actual: None,
            } => {
                write!(f, "invalid key type: expected a {expected} key, but no key is configured")
            }
            PastError::UnknownPurpose => {
                f.write_str("unknown purpose, or nothing configured to check it against")
            }
            PastError::VerificationFailed(_) => f.write_str("the token could not be verified"),
            PastError::NotAJsonToken => {
                f.write_str("the token payload is not a JSON object")
            }
            PastError::UnsupportedPurposeOrVersion => {
                f.write_str("no protocol operation matched the token")
            }
        }
    }
}

/// Failure raised by a protocol implementation.
///
/// The reason a cryptographic operation failed is deliberately not exposed:
/// the kind is private, there is no equality, and the only views are
/// [`std::fmt::Display`] and [`std::error::Error`]. A caller that could
/// branch on *why* verification failed would be an oracle for forgery and
/// chosen-ciphertext attacks.
pub struct ProtocolError(ErrorKind);

#[derive(Clone, Copy)]
enum ErrorKind {
    Framing,
    Key,
    Crypto,
}

impl ProtocolError {
    /// The token's segments did not match the protocol's framing.
    pub fn framing() -> Self {
        ProtocolError(ErrorKind::Framing)
    }

    /// The key material could not be decoded for this protocol.
    pub fn key() -> Self {
        ProtocolError(ErrorKind::Key)
    }

    /// A MAC, AEAD, or signature check failed.
    pub fn crypto() -> Self {
        ProtocolError(ErrorKind::Crypto)
    }
}

impl std::error::Error for ProtocolError {}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ErrorKind::Framing => f.write_str("token framing did not match the protocol"),
            ErrorKind::Key => f.write_str("the key material could not be decoded"),
            ErrorKind::Crypto => f.write_str("the cryptographic check failed"),
        }
    }
}

impl std::fmt::Debug for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProtocolError(..)")
    }
}
