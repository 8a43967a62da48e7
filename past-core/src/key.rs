//! Capability-tagged key material.
//!
//! A [`Key`] is opaque bytes plus a tag saying which class of operation the
//! bytes may be used for. The parser checks the tag against the token's
//! purpose before any cryptography runs; the protocol implementations decode
//! the bytes into their concrete key types.

use core::fmt;

use crate::ProtocolError;

/// The four key capabilities, one per purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Shared key used to verify `auth` tokens.
    SymmetricAuth,
    /// Shared key used to decrypt `enc` tokens.
    SymmetricCrypt,
    /// Private key used to unseal `seal` tokens.
    AsymmetricSecret,
    /// Public key used to verify `sign` tokens.
    AsymmetricPublic,
}

impl Capability {
    /// Stable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Capability::SymmetricAuth => "symmetric-authentication",
            Capability::SymmetricCrypt => "symmetric-encryption",
            Capability::AsymmetricSecret => "asymmetric-secret",
            Capability::AsymmetricPublic => "asymmetric-public",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque key material tagged with a [`Capability`].
///
/// The material's encoding is defined by the protocol version it is used
/// with (raw bytes for `v2`, DER or PEM for `v1` asymmetric keys); the
/// parser never interprets it. Immutable once constructed.
#[derive(Clone)]
pub struct Key {
    capability: Capability,
    material: Box<[u8]>,
}

impl Key {
    /// A shared key for verifying `auth` tokens.
    pub fn symmetric_auth(material: impl Into<Box<[u8]>>) -> Self {
        Key {
            capability: Capability::SymmetricAuth,
            material: material.into(),
        }
    }

    /// A shared key for decrypting `enc` tokens.
    pub fn symmetric_crypt(material: impl Into<Box<[u8]>>) -> Self {
        Key {
            capability: Capability::SymmetricCrypt,
            material: material.into(),
        }
    }

    /// A private key for unsealing `seal` tokens.
    pub fn asymmetric_secret(material: impl Into<Box<[u8]>>) -> Self {
        Key {
            capability: Capability::AsymmetricSecret,
            material: material.into(),
        }
    }

    /// A public key for verifying `sign` tokens.
    pub fn asymmetric_public(material: impl Into<Box<[u8]>>) -> Self {
        Key {
            capability: Capability::AsymmetricPublic,
            material: material.into(),
        }
    }

    /// The capability this key was constructed with.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Expose the raw material, re-checking the capability.
    ///
    /// Protocol implementations go through this even though the parser has
    /// already gated the purpose, so a protocol invoked directly cannot be
    /// handed the wrong class of key.
    pub fn expose_material(&self, capability: Capability) -> Result<&[u8], ProtocolError> {
        if self.capability == capability {
            Ok(&self.material)
        } else {
            Err(ProtocolError::key())
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key material never reaches Debug output
        write!(f, "Key({})", self.capability)
    }
}
