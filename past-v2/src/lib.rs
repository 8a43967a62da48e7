//! PAST protocol version 2.
//!
//! The modern suite: keyed BLAKE2b authentication, XChaCha20-Poly1305
//! encryption, X25519 sealing, and Ed25519 signatures. All keys are raw
//! 32-byte material (64 bytes for the Ed25519 signing key, secret followed
//! by public).

mod auth;
mod enc;
mod seal;
mod sign;

use past_core::ProtocolError;
use past_core::key::{Capability, Key};
use past_core::pae::WriteBytes;
use past_core::version::Protocol;

#[cfg(feature = "sealing")]
pub use auth::authenticate;
#[cfg(feature = "sealing")]
pub use enc::encrypt;
#[cfg(feature = "sealing")]
pub use seal::seal;
#[cfg(feature = "sealing")]
pub use sign::sign;

pub(crate) const HEADER: &str = "v2";

/// Protocol version `v2`.
pub struct V2;

impl Protocol for V2 {
    fn header(&self) -> &'static str {
        HEADER
    }

    fn verify_auth(
        &self,
        token: &str,
        key: &Key,
        footer: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        auth::verify(token, key.expose_material(Capability::SymmetricAuth)?, footer)
    }

    fn decrypt(&self, token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        enc::decrypt(token, key.expose_material(Capability::SymmetricCrypt)?, footer)
    }

    fn unseal(&self, token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        seal::unseal(token, key.expose_material(Capability::AsymmetricSecret)?, footer)
    }

    fn verify_signature(
        &self,
        token: &str,
        key: &Key,
        footer: &[u8],
    ) -> Result<Vec<u8>, ProtocolError> {
        sign::verify(token, key.expose_material(Capability::AsymmetricPublic)?, footer)
    }
}

/// Streams pre-authentication encoding into a MAC or digest context.
pub(crate) struct DigestWriter<'a, M: digest::Update>(pub &'a mut M);

impl<M: digest::Update> WriteBytes for DigestWriter<'_, M> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }
}
