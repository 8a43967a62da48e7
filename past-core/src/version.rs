//! The per-version protocol contract.

use crate::ProtocolError;
use crate::key::Key;

/// One protocol version: the four unsealing operations behind a header.
///
/// Implementations receive the *entire* raw token, not a pre-split payload,
/// and must re-validate the framing themselves (see
/// [`wire::split_framing`](crate::wire::split_framing)). The footer bytes
/// are authenticated data; an implementation must fail, never return partial
/// plaintext, when any check fails.
///
/// Which operation runs for which token is the parser's decision; an
/// operation handed a key of the wrong capability fails rather than
/// proceeding.
pub trait Protocol: Send + Sync {
    /// The version header this implementation answers to.
    fn header(&self) -> &'static str;

    /// Verify an `auth` token's MAC and return the cleartext message.
    fn verify_auth(&self, token: &str, key: &Key, footer: &[u8])
    -> Result<Vec<u8>, ProtocolError>;

    /// Decrypt an `enc` token and return the plaintext message.
    fn decrypt(&self, token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, ProtocolError>;

    /// Unseal a `seal` token with the recipient's secret key.
    fn unseal(&self, token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, ProtocolError>;

    /// Verify a `sign` token's signature and return the signed message.
    fn verify_signature(
        &self,
        token: &str,
        key: &Key,
        footer: &[u8],
    ) -> Result<Vec<u8>, ProtocolError>;
}
