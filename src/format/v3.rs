//! Envelope format v3.
//!
//! V3 Envelope Format (integers big-endian):
//! ```text
//! MAGIC (4) | VERSION (4) | SALT (16) | HMAC-SHA512 (64) | HMAC-KECCAK512 (64) | LAYERED
//! LAYERED = AES_NONCE (16) | TWOFISH_NONCE' (16) | XSALSA20_NONCE'' (24) | CIPHERTEXT
//! ```

use super::{Envelope, HEADER_LEN, MAGIC, MAGIC_LEN, VER_LEN};
use crate::crypto::{MAC_LEN, SALT_LEN};
use crate::error::{Error, Result};

/// Current envelope format version.
pub const VERSION_V3: u32 = 3;

const SALT_AT: usize = MAGIC_LEN + VER_LEN;
const MAC1_AT: usize = SALT_AT + SALT_LEN;
const MAC2_AT: usize = MAC1_AT + MAC_LEN;
const LAYERED_AT: usize = MAC2_AT + MAC_LEN;

/// `MAGIC | VERSION | SALT`
pub(crate) fn header_bytes(salt: &[u8; SALT_LEN]) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..MAGIC_LEN].copy_from_slice(MAGIC);
    header[MAGIC_LEN..SALT_AT].copy_from_slice(&VERSION_V3.to_be_bytes());
    header[SALT_AT..].copy_from_slice(salt);
    header
}

/// Parses a v3 envelope whose length, magic and version were already checked
/// by [`super::parse`].
pub(crate) fn parse(data: &[u8]) -> Result<Envelope<'_>> {
    let salt: [u8; SALT_LEN] = data[SALT_AT..MAC1_AT]
        .try_into()
        .map_err(|_| Error::InternalFault("invalid salt length"))?;

    Ok(Envelope {
        header: &data[..HEADER_LEN],
        salt,
        mac1: &data[MAC1_AT..MAC2_AT],
        mac2: &data[MAC2_AT..LAYERED_AT],
        layered: &data[LAYERED_AT..],
    })
}

/// Serializes the v3 layout.
pub(crate) fn serialize(
    salt: &[u8; SALT_LEN],
    mac1: &[u8; MAC_LEN],
    mac2: &[u8; MAC_LEN],
    layered: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LAYERED_AT + layered.len());

    buf.extend_from_slice(&header_bytes(salt));
    buf.extend_from_slice(mac1);
    buf.extend_from_slice(mac2);
    buf.extend_from_slice(layered);

    buf
}
