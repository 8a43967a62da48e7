//! PAST protocol version 1.
//!
//! The NIST-friendly suite: HMAC-SHA384 authentication, AES-256-CTR with
//! HMAC-SHA384 encrypt-then-MAC, RSA-OAEP-SHA384 sealing, and RSA-PSS-SHA384
//! signatures over 2048-bit keys. Prefer `past-v2` unless an operational
//! requirement pins you to this suite.

mod auth;
mod enc;
mod seal;
mod sign;

use past_core::ProtocolError;
use past_core::key::{Capability, Key};
use past_core::pae::WriteBytes;
use past_core::version::Protocol;
use rsa::traits::PublicKeyParts;

#[cfg(feature = "sealing")]
pub use auth::authenticate;
#[cfg(feature = "sealing")]
pub use enc::encrypt;
#[cfg(feature = "sealing")]
pub use seal::seal;
#[cfg(feature = "sealing")]
pub use sign::sign;

pub(crate) const HEADER: &str = "v1";

const MODULUS_BITS: usize = 2048;

/// Protocol version `v1`.
pub struct V1;

impl Protocol for V1 {
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

/// SPKI DER, falling back to PEM.
pub(crate) fn rsa_public_key(material: &[u8]) -> Result<rsa::RsaPublicKey, ProtocolError> {
    use rsa::pkcs8::spki::DecodePublicKey;

    let key = if let Ok(key) = rsa::RsaPublicKey::from_public_key_der(material) {
        key
    } else {
        let pem = std::str::from_utf8(material).map_err(|_| ProtocolError::key())?;
        rsa::RsaPublicKey::from_public_key_pem(pem).map_err(|_| ProtocolError::key())?
    };

    if key.n().bits() != MODULUS_BITS {
        return Err(ProtocolError::key());
    }

    Ok(key)
}

/// PKCS#1 DER, falling back to PEM.
pub(crate) fn rsa_secret_key(material: &[u8]) -> Result<rsa::RsaPrivateKey, ProtocolError> {
    use rsa::pkcs1::DecodeRsaPrivateKey;

    let key = if let Ok(key) = rsa::RsaPrivateKey::from_pkcs1_der(material) {
        key
    } else {
        let pem = std::str::from_utf8(material).map_err(|_| ProtocolError::key())?;
        rsa::RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| ProtocolError::key())?
    };

    if key.n().bits() != MODULUS_BITS {
        return Err(ProtocolError::key());
    }

    Ok(key)
}
