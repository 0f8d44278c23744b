//! HMAC-SHA-512 and HMAC-Keccak-512 over `header || layered output`.
//!
//! Two hash families so that a structural break in one does not forge the
//! envelope.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use sha3::Keccak512;
use subtle::ConstantTimeEq;

use super::MAC_LEN;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;
type HmacKeccak512 = Hmac<Keccak512>;

fn tag<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<[u8; MAC_LEN]> {
    let mut mac = <M as Mac>::new_from_slice(key)
        .map_err(|_| Error::InternalFault("HMAC rejected key"))?;
    mac.update(data);

    let out = mac.finalize().into_bytes();
    out.as_slice()
        .try_into()
        .map_err(|_| Error::InternalFault("HMAC output is not 64 bytes"))
}

/// Compute `(HMAC-SHA-512(key1, data), HMAC-Keccak-512(key2, data))`.
pub fn compute_macs(
    data: &[u8],
    mac_key1: &[u8],
    mac_key2: &[u8],
) -> Result<([u8; MAC_LEN], [u8; MAC_LEN])> {
    Ok((
        tag::<HmacSha512>(mac_key1, data)?,
        tag::<HmacKeccak512>(mac_key2, data)?,
    ))
}

/// Recompute both MACs and compare them in constant time.
///
/// Both comparisons always run; the result does not say which one failed.
pub fn verify_macs(
    data: &[u8],
    mac1: &[u8],
    mac2: &[u8],
    mac_key1: &[u8],
    mac_key2: &[u8],
) -> Result<bool> {
    let (expected1, expected2) = compute_macs(data, mac_key1, mac_key2)?;
    let ok = expected1[..].ct_eq(mac1) & expected2[..].ct_eq(mac2);
    Ok(ok.into())
}
