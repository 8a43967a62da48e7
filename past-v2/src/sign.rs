//! `v2.sign`: Ed25519 over the pre-authentication encoding, with the
//! signature carried as its own segment.

use ed25519_dalek::{Signature, VerifyingKey};
use past_core::ProtocolError;
use past_core::pae::pae_vec;
use past_core::purpose::Purpose;
use past_core::wire;

use crate::HEADER;

const PREFIX: &str = "v2.sign";
const SIG_LEN: usize = 64;

pub(crate) fn verify(token: &str, material: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let public: &[u8; 32] = material.try_into().map_err(|_| ProtocolError::key())?;
    let verifying_key = VerifyingKey::from_bytes(public).map_err(|_| ProtocolError::key())?;

    let segments = wire::split_framing(token, HEADER, Purpose::Sign, footer)?;
    let message = wire::decode_segment(segments.payload)?;
    let signature: [u8; SIG_LEN] = wire::decode_segment(segments.extra.ok_or_else(ProtocolError::framing)?)?
        .try_into()
        .map_err(|_| ProtocolError::framing())?;

    let signed = pae_vec(&[PREFIX.as_bytes(), &message, footer]);
    verifying_key
        .verify_strict(&signed, &Signature::from_bytes(&signature))
        .map_err(|_| ProtocolError::crypto())?;

    Ok(message)
}

/// Sign `message` into a complete `v2.sign` token.
///
/// The signing key material is 64 bytes: the secret scalar seed followed by
/// the public key, which must agree.
#[cfg(feature = "sealing")]
pub fn sign(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    use ed25519_dalek::{Signer, SigningKey};

    let material = key.expose_material(past_core::key::Capability::AsymmetricSecret)?;
    let (secret, public) = material.split_at_checked(32).ok_or_else(ProtocolError::key)?;
    let secret: &[u8; 32] = secret.try_into().map_err(|_| ProtocolError::key())?;
    let public: &[u8; 32] = public.try_into().map_err(|_| ProtocolError::key())?;

    let signing_key = SigningKey::from_bytes(secret);
    if signing_key.verifying_key().as_bytes() != public {
        return Err(ProtocolError::key());
    }

    let signed = pae_vec(&[PREFIX.as_bytes(), message, footer]);
    let signature = signing_key.sign(&signed);

    Ok(wire::assemble(
        HEADER,
        Purpose::Sign,
        &[message, &signature.to_bytes()],
        footer,
    ))
}
