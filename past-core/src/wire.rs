//! Wire-format framing.
//!
//! Tokens are `.`-joined unpadded base64url segments. The parser does a
//! coarse split to gate version and purpose; every protocol implementation
//! then re-validates the framing from the raw token through
//! [`split_framing`] before touching a single payload byte.

use base64ct::{Base64UrlUnpadded, Encoding};
use subtle::ConstantTimeEq;

use crate::ProtocolError;
use crate::purpose::Purpose;

/// Payload segments of a framed token, still base64url-encoded.
pub struct RawSegments<'a> {
    /// Segment 2, the first payload segment.
    pub payload: &'a str,
    /// Segment 3, present for the compound-payload purposes (`seal`, `sign`).
    pub extra: Option<&'a str>,
}

/// Re-validate the framing of `token` for a protocol operation.
///
/// Checks the header and purpose literals, the exact segment count (the
/// purpose minimum, plus one iff `footer` is non-empty), and that the
/// trailing segment decodes to exactly `footer`. The footer comparison is
/// constant-time; it is authenticated data and is never skipped.
pub fn split_framing<'a>(
    token: &'a str,
    header: &str,
    purpose: Purpose,
    footer: &[u8],
) -> Result<RawSegments<'a>, ProtocolError> {
    let segments: Vec<&str> = token.split('.').collect();

    let base = purpose.base_segments();
    let expected = base + usize::from(!footer.is_empty());
    if segments.len() != expected {
        return Err(ProtocolError::framing());
    }
    if segments[0] != header || segments[1] != purpose.as_str() {
        return Err(ProtocolError::framing());
    }

    if !footer.is_empty() {
        let trailing = decode_segment(segments[expected - 1])?;
        if !bool::from(trailing.ct_eq(footer)) {
            return Err(ProtocolError::framing());
        }
    }

    Ok(RawSegments {
        payload: segments[2],
        extra: (base == 4).then(|| segments[3]),
    })
}

/// Decode one base64url segment.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, ProtocolError> {
    Base64UrlUnpadded::decode_vec(segment).map_err(|_| ProtocolError::framing())
}

/// Assemble a token from already-sealed payload segments.
pub fn assemble(header: &str, purpose: Purpose, segments: &[&[u8]], footer: &[u8]) -> String {
    let mut token = String::with_capacity(
        header.len() + purpose.as_str().len() + segments.iter().map(|s| 1 + s.len() * 4 / 3).sum::<usize>(),
    );
    token.push_str(header);
    token.push('.');
    token.push_str(purpose.as_str());
    for segment in segments {
        token.push('.');
        token.push_str(&Base64UrlUnpadded::encode_string(segment));
    }
    if !footer.is_empty() {
        token.push('.');
        token.push_str(&Base64UrlUnpadded::encode_string(footer));
    }
    token
}
