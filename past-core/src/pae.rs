//! Pre-authentication encoding.
//!
//! Every piece that a protocol authenticates is framed with little-endian
//! 64-bit counts and lengths before it reaches the MAC, digest, or AEAD, so
//! no concatenation of pieces is ambiguous.

/// Byte sink for the encoding.
///
/// Implemented for `Vec<u8>` here and for MAC/digest contexts inside the
/// protocol crates, so authenticated data streams into the primitive without
/// an intermediate buffer.
pub trait WriteBytes {
    fn write(&mut self, bytes: &[u8]);
}

impl WriteBytes for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<W: WriteBytes + ?Sized> WriteBytes for &mut W {
    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes);
    }
}

/// Write the pre-authentication encoding of `pieces` into `out`.
pub fn pre_auth_encode(pieces: &[&[u8]], mut out: impl WriteBytes) {
    out.write(&(pieces.len() as u64).to_le_bytes());
    for piece in pieces {
        out.write(&(piece.len() as u64).to_le_bytes());
        out.write(piece);
    }
}

/// Pre-authentication encoding into a fresh buffer, for primitives that
/// take their authenticated data as one slice.
pub fn pae_vec(pieces: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    pre_auth_encode(pieces, &mut out);
    out
}
