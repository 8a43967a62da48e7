//! `v1.seal`: RSA-OAEP-SHA384 encapsulation of a 32-byte data key, with the
//! body sealed under the data key by the `v1.enc` construction. The
//! encapsulation bytes are bound into the body's authenticated pieces.

use past_core::ProtocolError;
use past_core::purpose::Purpose;
use past_core::wire;
use rsa::Oaep;
use sha2::Sha384;

use crate::{HEADER, enc};

const PREFIX: &str = "v1.seal";
const KEM_LEN: usize = 256;

pub(crate) fn unseal(token: &str, material: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let segments = wire::split_framing(token, HEADER, Purpose::Seal, footer)?;
    let encapsulated = wire::decode_segment(segments.payload)?;
    if encapsulated.len() != KEM_LEN {
        return Err(ProtocolError::framing());
    }
    let body = wire::decode_segment(segments.extra.ok_or_else(ProtocolError::framing)?)?;

    let secret_key = crate::rsa_secret_key(material)?;
    let data_key = secret_key
        .decrypt(Oaep::new::<Sha384>(), &encapsulated)
        .map_err(|_| ProtocolError::crypto())?;
    let data_key: [u8; 32] = data_key.try_into().map_err(|_| ProtocolError::crypto())?;

    enc::open(&data_key, PREFIX, &[&encapsulated], body, footer)
}

/// Seal `message` to a recipient's public key as a complete `v1.seal` token.
#[cfg(feature = "sealing")]
pub fn seal(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    use past_core::key::Capability;
    use rand_core::OsRng;

    let public_key = crate::rsa_public_key(key.expose_material(Capability::AsymmetricPublic)?)?;

    let mut data_key = [0u8; 32];
    getrandom::fill(&mut data_key).map_err(|_| ProtocolError::crypto())?;
    let encapsulated = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha384>(), &data_key)
        .map_err(|_| ProtocolError::crypto())?;

    let body = enc::close(&data_key, PREFIX, &[&encapsulated], message, footer)?;
    Ok(wire::assemble(
        HEADER,
        Purpose::Seal,
        &[&encapsulated, &body],
        footer,
    ))
}
