//! The purpose tags and their key-capability binding table.

use subtle::ConstantTimeEq;

use crate::key::Capability;

/// The cryptographic operation class a token declares.
///
/// Each purpose is bound 1:1 to the key capability allowed to process it;
/// [`Purpose::required_capability`] is that table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Shared-key authentication: readable payload with an appended MAC.
    Auth,
    /// Shared-key authenticated encryption.
    Enc,
    /// Public-key encryption, unsealed with the recipient's secret key.
    Seal,
    /// Public-key signature, verified with the signer's public key.
    Sign,
}

impl Purpose {
    pub(crate) const ALL: [Purpose; 4] = [Purpose::Auth, Purpose::Enc, Purpose::Seal, Purpose::Sign];

    /// The wire tag carried in the token's second segment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Purpose::Auth => "auth",
            Purpose::Enc => "enc",
            Purpose::Seal => "seal",
            Purpose::Sign => "sign",
        }
    }

    /// The key capability a token of this purpose must be processed with.
    pub const fn required_capability(self) -> Capability {
        match self {
            Purpose::Auth => Capability::SymmetricAuth,
            Purpose::Enc => Capability::SymmetricCrypt,
            Purpose::Seal => Capability::AsymmetricSecret,
            Purpose::Sign => Capability::AsymmetricPublic,
        }
    }

    /// Segment count of a token of this purpose without a footer.
    ///
    /// `seal` and `sign` payloads are compound (encapsulation + body,
    /// message + signature), so footer presence is always judged relative to
    /// this count, never by absolute index.
    pub const fn base_segments(self) -> usize {
        match self {
            Purpose::Auth | Purpose::Enc => 3,
            Purpose::Seal | Purpose::Sign => 4,
        }
    }

    /// Resolve a wire tag to a purpose.
    ///
    /// The tag may be attacker-influenced and is compared against every
    /// candidate in constant time, with no early exit, so resolution is not
    /// faster for any particular purpose.
    pub fn resolve(tag: &str) -> Option<Purpose> {
        let mut found = None;
        for candidate in Purpose::ALL {
            if bool::from(tag.as_bytes().ct_eq(candidate.as_str().as_bytes())) {
                found = Some(candidate);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_table() {
        assert_eq!(Purpose::Auth.required_capability(), Capability::SymmetricAuth);
        assert_eq!(Purpose::Enc.required_capability(), Capability::SymmetricCrypt);
        assert_eq!(Purpose::Seal.required_capability(), Capability::AsymmetricSecret);
        assert_eq!(Purpose::Sign.required_capability(), Capability::AsymmetricPublic);
    }

    #[test]
    fn segment_minimums() {
        assert_eq!(Purpose::Auth.base_segments(), 3);
        assert_eq!(Purpose::Enc.base_segments(), 3);
        assert_eq!(Purpose::Seal.base_segments(), 4);
        assert_eq!(Purpose::Sign.base_segments(), 4);
    }

    #[test]
    fn resolve_known_tags() {
        for purpose in Purpose::ALL {
            assert_eq!(Purpose::resolve(purpose.as_str()), Some(purpose));
        }
    }

    #[test]
    fn resolve_rejects_unknown_tags() {
        assert_eq!(Purpose::resolve(""), None);
        assert_eq!(Purpose::resolve("AUTH"), None);
        assert_eq!(Purpose::resolve("local"), None);
        assert_eq!(Purpose::resolve("auth "), None);
        assert_eq!(Purpose::resolve("signn"), None);
    }
}
