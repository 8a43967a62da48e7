//! `v2.seal`: ephemeral X25519 key agreement, with the body encrypted by
//! XChaCha20-Poly1305 under a key and nonce derived from the shared secret.
//! The ephemeral public key rides as its own segment and is bound into the
//! associated data, along with the recipient key, through the derivation.

use chacha20poly1305::aead::AeadInPlace;
use chacha20poly1305::{Key, KeyInit, Tag, XChaCha20Poly1305, XNonce};
use curve25519_dalek::MontgomeryPoint;
use digest::{FixedOutput, Update};
use generic_array::typenum::{U24, U32};
use past_core::ProtocolError;
use past_core::pae::pae_vec;
use past_core::purpose::Purpose;
use past_core::wire;

use crate::HEADER;

const PREFIX: &str = "v2.seal";
const TAG_LEN: usize = 16;

pub(crate) fn unseal(token: &str, material: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let secret: &[u8; 32] = material.try_into().map_err(|_| ProtocolError::key())?;

    let segments = wire::split_framing(token, HEADER, Purpose::Seal, footer)?;
    let epk: [u8; 32] = wire::decode_segment(segments.payload)?
        .try_into()
        .map_err(|_| ProtocolError::framing())?;
    let mut body = wire::decode_segment(segments.extra.ok_or_else(ProtocolError::framing)?)?;
    if body.len() < TAG_LEN {
        return Err(ProtocolError::framing());
    }

    let recipient = MontgomeryPoint::mul_base_clamped(*secret);
    let shared = MontgomeryPoint(epk).mul_clamped(*secret);
    let (key, nonce) = derive(&shared, &epk, &recipient);

    let tag = body.split_off(body.len() - TAG_LEN);
    let aad = pae_vec(&[PREFIX.as_bytes(), &epk, footer]);
    XChaCha20Poly1305::new(&key)
        .decrypt_in_place_detached(&nonce, &aad, &mut body, Tag::from_slice(&tag))
        .map_err(|_| ProtocolError::crypto())?;

    Ok(body)
}

/// Seal `message` to a recipient's public key as a complete `v2.seal` token.
#[cfg(feature = "sealing")]
pub fn seal(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    let recipient: [u8; 32] = key
        .expose_material(past_core::key::Capability::AsymmetricPublic)?
        .try_into()
        .map_err(|_| ProtocolError::key())?;
    let recipient = MontgomeryPoint(recipient);

    let mut ephemeral = [0u8; 32];
    getrandom::fill(&mut ephemeral).map_err(|_| ProtocolError::crypto())?;
    let epk = MontgomeryPoint::mul_base_clamped(ephemeral);
    let shared = recipient.mul_clamped(ephemeral);
    let (key, nonce) = derive(&shared, epk.as_bytes(), &recipient);

    let mut body = message.to_vec();
    let aad = pae_vec(&[PREFIX.as_bytes(), epk.as_bytes(), footer]);
    let tag = XChaCha20Poly1305::new(&key)
        .encrypt_in_place_detached(&nonce, &aad, &mut body)
        .map_err(|_| ProtocolError::crypto())?;
    body.extend_from_slice(&tag);

    Ok(wire::assemble(
        HEADER,
        Purpose::Seal,
        &[epk.as_bytes(), &body],
        footer,
    ))
}

/// Derive the body key and nonce from the exchange, binding both public
/// keys so a transplanted ephemeral segment derives nothing useful.
fn derive(shared: &MontgomeryPoint, epk: &[u8; 32], recipient: &MontgomeryPoint) -> (Key, XNonce) {
    let mut ek = blake2::Blake2b::<U32>::default();
    ek.update(b"\x01");
    ek.update(PREFIX.as_bytes());
    ek.update(shared.as_bytes());
    ek.update(epk);
    ek.update(recipient.as_bytes());
    let ek = ek.finalize_fixed();

    let mut n = blake2::Blake2b::<U24>::default();
    n.update(b"\x02");
    n.update(PREFIX.as_bytes());
    n.update(epk);
    n.update(recipient.as_bytes());
    let n = n.finalize_fixed();

    (ek, n)
}
