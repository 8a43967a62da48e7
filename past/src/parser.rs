use base64ct::{Base64UrlUnpadded, Encoding};
use subtle::ConstantTimeEq;

use past_core::PastError;
use past_core::claims::Claims;
use past_core::key::Key;
use past_core::purpose::Purpose;
use past_core::version::Protocol;

use crate::DEFAULT_PROTOCOLS;
use crate::token::ParsedToken;

/// The token parser: validates structure, enforces version, purpose, and
/// key-capability policy, dispatches to the protocol named by the header,
/// and rebuilds the claims from the verified payload.
///
/// `parse` is a pure function of the token and the configuration; it takes
/// `&self`, while the configuration setters take `&mut self`, so a parser
/// shared across threads is immutable while in use. For staged
/// reconfiguration under contention, construct a fresh parser per caller
/// instead of sharing one behind a lock.
pub struct Parser {
    protocols: Vec<&'static dyn Protocol>,
    allowed: Vec<String>,
    purpose: Option<Purpose>,
    key: Option<Key>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<&'static str> = self.protocols.iter().map(|p| p.header()).collect();
        f.debug_struct("Parser")
            .field("protocols", &headers)
            .field("allowed", &self.allowed)
            .field("purpose", &self.purpose)
            .field("key", &self.key)
            .finish()
    }
}

impl Parser {
    /// A parser accepting every registered version, any purpose, with no
    /// key configured yet.
    pub fn new() -> Self {
        Parser::with_protocols(&DEFAULT_PROTOCOLS)
    }

    /// A parser over a custom protocol registry.
    pub fn with_protocols(protocols: &[&'static dyn Protocol]) -> Self {
        Parser {
            protocols: protocols.to_vec(),
            allowed: protocols.iter().map(|p| p.header().to_owned()).collect(),
            purpose: None,
            key: None,
        }
    }

    /// Start building a fully-validated parser.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Restrict the allowed version headers.
    ///
    /// Headers without a registered protocol are tolerated here and rejected
    /// at parse time.
    pub fn allow_versions<I, S>(&mut self, versions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the configured key.
    ///
    /// With `check_purpose`, fails [`PastError::InvalidKeyType`] unless the
    /// key's capability matches the pinned purpose, or
    /// [`PastError::UnknownPurpose`] when no purpose is pinned to check
    /// against. Without it the key is accepted unconditionally; the
    /// per-call capability gate in [`parse`](Parser::parse) still applies.
    pub fn set_key(&mut self, key: Key, check_purpose: bool) -> Result<&mut Self, PastError> {
        if check_purpose {
            let purpose = self.purpose.ok_or(PastError::UnknownPurpose)?;
            let expected = purpose.required_capability();
            if key.capability() != expected {
                return Err(PastError::InvalidKeyType {
                    expected,
                    actual: Some(key.capability()),
                });
            }
        }
        self.key = Some(key);
        Ok(self)
    }

    /// Pin the accepted purpose.
    ///
    /// The purpose string is resolved in constant time. With
    /// `check_key_type`, fails [`PastError::DisallowedPurpose`] unless the
    /// currently held key's capability matches the new purpose, or
    /// [`PastError::UnknownPurpose`] when no key is held.
    pub fn set_purpose(
        &mut self,
        purpose: &str,
        check_key_type: bool,
    ) -> Result<&mut Self, PastError> {
        let purpose = Purpose::resolve(purpose).ok_or(PastError::UnknownPurpose)?;
        if check_key_type {
            let key = self.key.as_ref().ok_or(PastError::UnknownPurpose)?;
            if key.capability() != purpose.required_capability() {
                return Err(PastError::DisallowedPurpose);
            }
        }
        self.purpose = Some(purpose);
        Ok(self)
    }

    /// Parse and verify a token.
    ///
    /// Every stage short-circuits; nothing is returned until the structure,
    /// the version and purpose policy, the key capability, the cryptographic
    /// check, and the claims decoding have all passed.
    pub fn parse(&self, token: &str) -> Result<ParsedToken, PastError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() < 3 {
            return Err(PastError::TruncatedOrInvalid);
        }

        // version tags are public; ordinary equality is fine here
        let header = segments[0];
        if !self.allowed.iter().any(|allowed| allowed == header) {
            return Err(PastError::UnsupportedVersion);
        }
        let protocol = self
            .protocols
            .iter()
            .copied()
            .find(|protocol| protocol.header() == header)
            .ok_or(PastError::UnsupportedVersion)?;

        // the purpose is attacker-controlled; the pinned comparison must not
        // leak which purposes this parser accepts
        let tag = segments[1];
        if let Some(pinned) = self.purpose {
            if !bool::from(tag.as_bytes().ct_eq(pinned.as_str().as_bytes())) {
                return Err(PastError::DisallowedPurpose);
            }
        }
        let Some(purpose) = Purpose::resolve(tag) else {
            // no dispatch branch can produce output for this tag
            return Err(PastError::UnsupportedPurposeOrVersion);
        };

        let expected = purpose.required_capability();
        let key = self.key.as_ref().ok_or(PastError::InvalidKeyType {
            expected,
            actual: None,
        })?;
        if key.capability() != expected {
            return Err(PastError::InvalidKeyType {
                expected,
                actual: Some(key.capability()),
            });
        }

        // footer presence is relative to the purpose's segment minimum; the
        // protocol re-authenticates these bytes
        let footer = if segments.len() > purpose.base_segments() {
            Base64UrlUnpadded::decode_vec(segments[segments.len() - 1])
                .map_err(|_| PastError::TruncatedOrInvalid)?
        } else {
            Vec::new()
        };

        let payload = match purpose {
            Purpose::Auth => protocol.verify_auth(token, key, &footer),
            Purpose::Enc => protocol.decrypt(token, key, &footer),
            Purpose::Seal => protocol.unseal(token, key, &footer),
            Purpose::Sign => protocol.verify_signature(token, key, &footer),
        }
        .map_err(PastError::VerificationFailed)?;

        let claims = Claims::decode(&payload)?;

        Ok(ParsedToken::new(
            protocol.header(),
            purpose,
            footer,
            key.clone(),
            claims,
        ))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

/// Builds a [`Parser`] whose purpose/key binding is validated up front.
///
/// [`build`](ParserBuilder::build) always checks the binding when both a
/// purpose and a key are supplied; the checked/unchecked staging of
/// [`Parser::set_key`] and [`Parser::set_purpose`] exists for callers that
/// configure in stages.
pub struct ParserBuilder {
    protocols: Vec<&'static dyn Protocol>,
    allowed: Option<Vec<String>>,
    purpose: Option<String>,
    key: Option<Key>,
}

impl ParserBuilder {
    fn new() -> Self {
        ParserBuilder {
            protocols: DEFAULT_PROTOCOLS.to_vec(),
            allowed: None,
            purpose: None,
            key: None,
        }
    }

    /// Use a custom protocol registry.
    pub fn protocols(mut self, protocols: &[&'static dyn Protocol]) -> Self {
        self.protocols = protocols.to_vec();
        self
    }

    /// Restrict the allowed version headers.
    pub fn allow_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    /// Pin the accepted purpose.
    pub fn purpose(mut self, purpose: &str) -> Self {
        self.purpose = Some(purpose.to_owned());
        self
    }

    /// Configure the key.
    pub fn key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// Validate the configuration and produce the parser.
    pub fn build(self) -> Result<Parser, PastError> {
        let mut parser = Parser::with_protocols(&self.protocols);
        if let Some(allowed) = self.allowed {
            parser.allowed = allowed;
        }
        if let Some(tag) = self.purpose.as_deref() {
            parser.purpose = Some(Purpose::resolve(tag).ok_or(PastError::UnknownPurpose)?);
        }
        if let Some(key) = self.key {
            if let Some(purpose) = parser.purpose {
                let expected = purpose.required_capability();
                if key.capability() != expected {
                    return Err(PastError::InvalidKeyType {
                        expected,
                        actual: Some(key.capability()),
                    });
                }
            }
            parser.key = Some(key);
        }
        Ok(parser)
    }
}
