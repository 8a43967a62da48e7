//! `v2.enc`: XChaCha20-Poly1305 with the pre-authentication encoding as
//! associated data.

use chacha20poly1305::aead::AeadInPlace;
use chacha20poly1305::{KeyInit, Tag, XChaCha20Poly1305, XNonce};
use past_core::ProtocolError;
use past_core::pae::pae_vec;
use past_core::purpose::Purpose;
use past_core::wire;

use crate::HEADER;

const PREFIX: &str = "v2.enc";
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

pub(crate) fn decrypt(token: &str, key: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let key: &[u8; 32] = key.try_into().map_err(|_| ProtocolError::key())?;
    let segments = wire::split_framing(token, HEADER, Purpose::Enc, footer)?;
    let mut payload = wire::decode_segment(segments.payload)?;
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(ProtocolError::framing());
    }

    let tag = payload.split_off(payload.len() - TAG_LEN);
    let mut body = payload.split_off(NONCE_LEN);
    let nonce = payload;

    let aad = pae_vec(&[PREFIX.as_bytes(), &nonce, footer]);
    XChaCha20Poly1305::new(key.into())
        .decrypt_in_place_detached(
            XNonce::from_slice(&nonce),
            &aad,
            &mut body,
            Tag::from_slice(&tag),
        )
        .map_err(|_| ProtocolError::crypto())?;

    Ok(body)
}

/// Encrypt `message` into a complete `v2.enc` token.
#[cfg(feature = "sealing")]
pub fn encrypt(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    use blake2::Blake2bMac;
    use digest::Mac;
    use generic_array::typenum::U24;

    let key: &[u8; 32] = key
        .expose_material(past_core::key::Capability::SymmetricCrypt)?
        .try_into()
        .map_err(|_| ProtocolError::key())?;

    // nonce = MAC(seed, message): reuse needs both a repeated seed and a
    // repeated message
    let mut seed = [0u8; NONCE_LEN];
    getrandom::fill(&mut seed).map_err(|_| ProtocolError::crypto())?;
    let mut derive: Blake2bMac<U24> =
        <Blake2bMac<U24> as Mac>::new_from_slice(&seed).expect("24-byte keys are valid for BLAKE2b");
    derive.update(message);
    let nonce = derive.finalize().into_bytes();

    let mut body = message.to_vec();
    let aad = pae_vec(&[PREFIX.as_bytes(), &nonce, footer]);
    let tag = XChaCha20Poly1305::new(key.into())
        .encrypt_in_place_detached(XNonce::from_slice(&nonce), &aad, &mut body)
        .map_err(|_| ProtocolError::crypto())?;

    let mut payload = Vec::with_capacity(NONCE_LEN + body.len() + TAG_LEN);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&body);
    payload.extend_from_slice(&tag);

    Ok(wire::assemble(HEADER, Purpose::Enc, &[&payload], footer))
}
