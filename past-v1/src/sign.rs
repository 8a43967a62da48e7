//! `v1.sign`: RSA-PSS-SHA384 over the pre-authentication encoding, with the
//! signature carried as its own segment.

use digest::Digest;
use past_core::ProtocolError;
use past_core::pae::pre_auth_encode;
use past_core::purpose::Purpose;
use past_core::wire;
use rsa::pss::Signature;
use rsa::signature::DigestVerifier;
use sha2::Sha384;

use crate::{DigestWriter, HEADER};

const PREFIX: &str = "v1.sign";
const SIG_LEN: usize = 256;

pub(crate) fn verify(token: &str, material: &[u8], footer: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let segments = wire::split_framing(token, HEADER, Purpose::Sign, footer)?;
    let message = wire::decode_segment(segments.payload)?;
    let signature = wire::decode_segment(segments.extra.ok_or_else(ProtocolError::framing)?)?;
    if signature.len() != SIG_LEN {
        return Err(ProtocolError::framing());
    }

    let verifying_key = rsa::pss::VerifyingKey::<Sha384>::new(crate::rsa_public_key(material)?);
    let signature = Signature::try_from(&signature[..]).map_err(|_| ProtocolError::framing())?;

    let mut digest = Sha384::new();
    pre_auth_encode(
        &[PREFIX.as_bytes(), &message, footer],
        DigestWriter(&mut digest),
    );
    verifying_key
        .verify_digest(digest, &signature)
        .map_err(|_| ProtocolError::crypto())?;

    Ok(message)
}

/// Sign `message` into a complete `v1.sign` token.
#[cfg(feature = "sealing")]
pub fn sign(
    message: &[u8],
    key: &past_core::key::Key,
    footer: &[u8],
) -> Result<String, ProtocolError> {
    use past_core::key::Capability;
    use rand_core::OsRng;
    use rsa::signature::{RandomizedDigestSigner, SignatureEncoding};

    let signing_key = rsa::pss::SigningKey::<Sha384>::new(crate::rsa_secret_key(
        key.expose_material(Capability::AsymmetricSecret)?,
    )?);

    let mut digest = Sha384::new();
    pre_auth_encode(&[PREFIX.as_bytes(), message, footer], DigestWriter(&mut digest));
    let signature = signing_key
        .try_sign_digest_with_rng(&mut OsRng, digest)
        .map_err(|_| ProtocolError::crypto())?
        .to_vec();

    Ok(wire::assemble(
        HEADER,
        Purpose::Sign,
        &[message, &signature],
        footer,
    ))
}
