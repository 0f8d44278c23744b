//! Envelope handling.
//!
//! Checks the magic bytes and dispatches on the version field. Only version 3
//! exists on the wire today.

use crate::crypto::{MAC_LEN, NONCES_LEN, SALT_LEN};
use crate::error::{Error, Result};

pub mod v3;

/// Magic bytes opening every envelope.
pub const MAGIC: &[u8; 4] = b"\x1c\x94\xd7\xde";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 4;
/// Length of the big-endian version field.
pub const VER_LEN: usize = 4;
/// Latest format version
pub const CURRENT_VERSION: u32 = v3::VERSION_V3;

/// Bytes covered by the MACs ahead of the layered output: magic, version, salt.
pub const HEADER_LEN: usize = MAGIC_LEN + VER_LEN + SALT_LEN;
/// Everything an envelope adds on top of the plaintext.
pub const OVERHEAD: usize = HEADER_LEN + 2 * MAC_LEN + NONCES_LEN;

/// A parsed envelope borrowing from the input buffer.
#[derive(Debug)]
pub(crate) struct Envelope<'a> {
    header: &'a [u8],
    salt: [u8; SALT_LEN],
    mac1: &'a [u8],
    mac2: &'a [u8],
    layered: &'a [u8],
}

impl<'a> Envelope<'a> {
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn mac1(&self) -> &'a [u8] {
        self.mac1
    }

    pub fn mac2(&self) -> &'a [u8] {
        self.mac2
    }

    /// Nonces followed by the triple-encrypted payload.
    pub fn layered(&self) -> &'a [u8] {
        self.layered
    }

    /// `header || layered`, the input to both MACs.
    pub fn authenticated_data(&self) -> Vec<u8> {
        join(self.header, self.layered)
    }
}

fn join(header: &[u8], layered: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(header.len() + layered.len());
    data.extend_from_slice(header);
    data.extend_from_slice(layered);
    data
}

/// MAC input for an envelope that is still being built.
pub(crate) fn authenticated_data(salt: &[u8; SALT_LEN], layered: &[u8]) -> Vec<u8> {
    join(&v3::header_bytes(salt), layered)
}

/// Parses an envelope.
///
/// Automatically dispatches to the appropriate version parser.
///
/// # Errors
///
/// Returns an error if:
/// - The envelope is not longer than [`OVERHEAD`]
/// - The magic bytes are invalid
/// - The version is unsupported
pub(crate) fn parse(data: &[u8]) -> Result<Envelope<'_>> {
    if data.len() <= OVERHEAD {
        return Err(Error::MalformedEnvelope(
            "too short to be a TripleSec ciphertext",
        ));
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(Error::MalformedEnvelope(
            "does not look like a TripleSec ciphertext",
        ));
    }

    let version = u32::from_be_bytes(
        data[MAGIC_LEN..MAGIC_LEN + VER_LEN]
            .try_into()
            .map_err(|_| Error::InternalFault("version field is not 4 bytes"))?,
    );

    match version {
        v3::VERSION_V3 => v3::parse(data),
        other => Err(Error::UnsupportedVersion(other)),
    }
}

/// Serializes an envelope in the current format.
pub(crate) fn serialize(
    salt: &[u8; SALT_LEN],
    mac1: &[u8; MAC_LEN],
    mac2: &[u8; MAC_LEN],
    layered: &[u8],
) -> Vec<u8> {
    v3::serialize(salt, mac1, mac2, layered)
}

/// Envelope size for a plaintext of `plaintext_len` bytes.
pub fn envelope_len(plaintext_len: usize) -> usize {
    plaintext_len + OVERHEAD
}

/// Plaintext size carried by an envelope of `envelope_len` bytes, or `None`
/// if no valid envelope has that length.
pub fn plaintext_len(envelope_len: usize) -> Option<usize> {
    envelope_len.checked_sub(OVERHEAD).filter(|&n| n > 0)
}
