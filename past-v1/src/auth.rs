//! `v1.auth`: HMAC-SHA384 over the pre-authentication encoding, tag
//! appended to the readable message.

use hmac::{Hmac, Mac};
use past_core::ProtocolError;
use past_core::pae::pre_auth_encode;
use past_core::purpose::Purpose;
use past_core::wire;
use sha2::Sha384;

use crate::{DigestWriter, HEADER};

const PREFIX: &str = "v1.auth";
const TAG_LEN: usize = 48;

pub(crate) fn verify(token: &str, key: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let segments = wire::split_framing(token, HEADER, Purpose::Auth, footer)?;
    let mut payload = wire::decode_segment(segments.payload)?;
    if payload.len() < TAG_LEN {
        return Err(ProtocolError::framing());
    }
    let split = payload.len() - TAG_LEN;

    let mut mac = mac(key)?;
    pre_auth_encode(
        &[PREFIX.as_bytes(), &payload[..split], footer],
        DigestWriter(&mut mac),
    );
    mac.verify_slice(&payload[split..])
        .map_err(|_| ProtocolError::crypto())?;

    payload.truncate(split);
    Ok(payload)
}

/// Authenticate `message` into a complete `v1.auth` token.
#[cfg(feature = "sealing")]
pub fn authenticate(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    let key = key.expose_material(past_core::key::Capability::SymmetricAuth)?;

    let mut mac = mac(key)?;
    pre_auth_encode(&[PREFIX.as_bytes(), message, footer], DigestWriter(&mut mac));
    let tag = mac.finalize().into_bytes();

    let mut payload = Vec::with_capacity(message.len() + TAG_LEN);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&tag);

    Ok(wire::assemble(HEADER, Purpose::Auth, &[&payload], footer))
}

fn mac(key: &[u8]) -> Result<Hmac<Sha384>, ProtocolError> {
    Hmac::new_from_slice(key).map_err(|_| ProtocolError::key())
}
