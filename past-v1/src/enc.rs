//! `v1.enc`: AES-256-CTR with HMAC-SHA384 encrypt-then-MAC, cipher and auth
//! keys derived per-nonce with HKDF-SHA384.

use aes::Aes256;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr64BE;
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use past_core::ProtocolError;
use past_core::pae::pre_auth_encode;
use past_core::purpose::Purpose;
use past_core::wire;
use sha2::Sha384;

use crate::{DigestWriter, HEADER};

const PREFIX: &str = "v1.enc";
pub(crate) const NONCE_LEN: usize = 32;
pub(crate) const TAG_LEN: usize = 48;

type Cipher = Ctr64BE<Aes256>;

pub(crate) fn decrypt(token: &str, key: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let key: &[u8; 32] = key.try_into().map_err(|_| ProtocolError::key())?;
    let segments = wire::split_framing(token, HEADER, Purpose::Enc, footer)?;
    let payload = wire::decode_segment(segments.payload)?;
    open(key, PREFIX, &[], payload, footer)
}

/// Verify-then-decrypt one `nonce || ciphertext || tag` payload.
///
/// `bound` carries extra authenticated pieces ahead of the nonce (the key
/// encapsulation, for `seal`).
pub(crate) fn open(
    key: &[u8; 32],
    prefix: &str,
    bound: &[&[u8]],
    mut payload: Vec<u8>,
    footer: &[u8],
) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(ProtocolError::framing());
    }
    let tag_at = payload.len() - TAG_LEN;
    let (body, tag) = payload.split_at(tag_at);
    let (nonce, ciphertext) = body.split_at(NONCE_LEN);

    let (mut cipher, mut mac) = keys(key, nonce.try_into().expect("nonce length checked"));

    let mut pieces: Vec<&[u8]> = Vec::with_capacity(bound.len() + 4);
    pieces.push(prefix.as_bytes());
    pieces.extend_from_slice(bound);
    pieces.push(nonce);
    pieces.push(ciphertext);
    pieces.push(footer);
    pre_auth_encode(&pieces, DigestWriter(&mut mac));
    mac.verify_slice(tag).map_err(|_| ProtocolError::crypto())?;

    payload.truncate(tag_at);
    payload.drain(..NONCE_LEN);
    cipher.apply_keystream(&mut payload);
    Ok(payload)
}

/// Encrypt-then-MAC one message into a `nonce || ciphertext || tag` payload.
#[cfg(feature = "sealing")]
pub(crate) fn close(
    key: &[u8; 32],
    prefix: &str,
    bound: &[&[u8]],
    message: &[u8],
    footer: &[u8],
) -> Result<Vec<u8>, ProtocolError> {
    // nonce = MAC(seed, message): reuse needs both a repeated seed and a
    // repeated message
    let mut seed = [0u8; NONCE_LEN];
    getrandom::fill(&mut seed).map_err(|_| ProtocolError::crypto())?;
    let mut derive: Hmac<Sha384> =
        Hmac::new_from_slice(&seed).expect("HMAC accepts any key length");
    derive.update(message);
    let nonce: [u8; NONCE_LEN] = derive.finalize().into_bytes()[..NONCE_LEN]
        .try_into()
        .expect("SHA-384 output is wider than the nonce");

    let (mut cipher, mut mac) = keys(key, &nonce);
    let mut ciphertext = message.to_vec();
    cipher.apply_keystream(&mut ciphertext);

    let mut pieces: Vec<&[u8]> = Vec::with_capacity(bound.len() + 4);
    pieces.push(prefix.as_bytes());
    pieces.extend_from_slice(bound);
    pieces.push(&nonce);
    pieces.push(&ciphertext);
    pieces.push(footer);
    pre_auth_encode(&pieces, DigestWriter(&mut mac));
    let tag = mac.finalize().into_bytes();

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len() + TAG_LEN);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    payload.extend_from_slice(&tag);
    Ok(payload)
}

/// Encrypt `message` into a complete `v1.enc` token.
#[cfg(feature = "sealing")]
pub fn encrypt(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    let key: &[u8; 32] = key
        .expose_material(past_core::key::Capability::SymmetricCrypt)?
        .try_into()
        .map_err(|_| ProtocolError::key())?;
    let payload = close(key, PREFIX, &[], message, footer)?;
    Ok(wire::assemble(HEADER, Purpose::Enc, &[&payload], footer))
}

fn keys(key: &[u8; 32], nonce: &[u8; NONCE_LEN]) -> (Cipher, Hmac<Sha384>) {
    let (salt, iv) = nonce.split_at(16);

    let mut ek = [0u8; 32];
    Hkdf::<Sha384>::new(Some(salt), key)
        .expand(b"past-encryption-key", &mut ek)
        .expect("32 bytes is a valid HKDF-SHA384 output length");
    let mut ak = [0u8; 32];
    Hkdf::<Sha384>::new(Some(salt), key)
        .expand(b"past-auth-key-for-aead", &mut ak)
        .expect("32 bytes is a valid HKDF-SHA384 output length");

    let iv: &[u8; 16] = iv.try_into().expect("nonce splits into two halves");
    let cipher = Cipher::new((&ek).into(), iv.into());
    let mac = Hmac::new_from_slice(&ak).expect("HMAC accepts any key length");
    (cipher, mac)
}
