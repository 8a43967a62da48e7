use past_core::claims::Claims;
use past_core::key::Key;
use past_core::purpose::Purpose;

/// A fully verified token.
///
/// Constructed only after every structural, capability, and cryptographic
/// check in [`Parser::parse`](crate::Parser::parse) has passed; immutable
/// thereafter.
#[derive(Debug)]
pub struct ParsedToken {
    version: &'static str,
    purpose: Purpose,
    footer: Vec<u8>,
    key: Key,
    claims: Claims,
}

impl ParsedToken {
    pub(crate) fn new(
        version: &'static str,
        purpose: Purpose,
        footer: Vec<u8>,
        key: Key,
        claims: Claims,
    ) -> Self {
        ParsedToken {
            version,
            purpose,
            footer,
            key,
            claims,
        }
    }

    /// The version header that selected the protocol.
    pub fn version(&self) -> &str {
        self.version
    }

    /// The purpose the token declared and the parser verified under.
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// The authenticated footer; empty when the token carried none.
    pub fn footer(&self) -> &[u8] {
        &self.footer
    }

    /// The key the token was verified or decrypted with.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The verified claims.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Consume the token, yielding its claims.
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}
