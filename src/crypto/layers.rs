//! The AES / Twofish / XSalsa20 cascade.
//!
//! Layout produced by [`encrypt_layers`]:
//! ```text
//! OUTER_NONCE (16) | MIDDLE_NONCE' (16) | INNER_NONCE'' (24) | CIPHERTEXT
//! ```
//! Each layer XORs its keystream over everything to its right, inner nonces
//! included, so only the outer nonce travels in the clear.

use aes::Aes256;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};
use getrandom::fill;
use salsa20::XSalsa20;
use twofish::Twofish;
use zeroize::Zeroizing;

use super::kdf::DerivedKeys;
use super::{INNER_NONCE_LEN, MIDDLE_NONCE_LEN, NONCES_LEN, OUTER_NONCE_LEN, SALT_LEN};
use crate::error::{Error, Result};

type OuterCipher = Ctr128BE<Aes256>;
type MiddleCipher = Ctr128BE<Twofish>;
type InnerCipher = XSalsa20;

const OUTER_AT: usize = 0;
const MIDDLE_AT: usize = OUTER_AT + OUTER_NONCE_LEN;
const INNER_AT: usize = MIDDLE_AT + MIDDLE_NONCE_LEN;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::InternalFault("OS random generator unavailable"))
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// XOR the keystream for `nonce = region[..nonce_len]` over the rest of `region`.
fn apply_layer<C>(
    key: &[u8],
    region: &mut [u8],
    nonce_len: usize,
    name: &'static str,
) -> Result<()>
where
    C: KeyIvInit + StreamCipher,
{
    let (nonce, body) = region.split_at_mut(nonce_len);
    let mut cipher = C::new_from_slices(key, nonce)
        .map_err(|_| Error::InternalFault("cipher rejected fixed-size key or nonce"))?;
    cipher.apply_keystream(body);
    tracing::trace!(layer = name, len = body.len(), "applied cipher layer");
    Ok(())
}

/// Encrypt `plaintext` through all three layers, innermost first.
///
/// Returns `plaintext.len() + NONCES_LEN` bytes.
pub fn encrypt_layers(keys: &DerivedKeys, plaintext: &[u8]) -> Result<Vec<u8>> {
    // Holds a plain copy until the inner layer has run.
    let mut buf = Zeroizing::new(vec![0u8; NONCES_LEN + plaintext.len()]);
    buf[NONCES_LEN..].copy_from_slice(plaintext);

    secure_random(&mut buf[INNER_AT..NONCES_LEN])?;
    apply_layer::<InnerCipher>(
        keys.inner()?,
        &mut buf[INNER_AT..],
        INNER_NONCE_LEN,
        "xsalsa20",
    )?;

    secure_random(&mut buf[MIDDLE_AT..INNER_AT])?;
    apply_layer::<MiddleCipher>(
        keys.middle(),
        &mut buf[MIDDLE_AT..],
        MIDDLE_NONCE_LEN,
        "twofish-ctr",
    )?;

    secure_random(&mut buf[OUTER_AT..MIDDLE_AT])?;
    apply_layer::<OuterCipher>(
        keys.outer(),
        &mut buf[OUTER_AT..],
        OUTER_NONCE_LEN,
        "aes-ctr",
    )?;

    Ok(std::mem::take(&mut *buf))
}

/// Peel the three layers off `data`, outermost first.
///
/// `data` must start with the three nonces. Callers verify the MACs before
/// getting here.
pub fn decrypt_layers(keys: &DerivedKeys, data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if data.len() < NONCES_LEN {
        return Err(Error::InternalFault("layered input shorter than its nonces"));
    }

    let mut buf = Zeroizing::new(data.to_vec());

    apply_layer::<OuterCipher>(
        keys.outer(),
        &mut buf[OUTER_AT..],
        OUTER_NONCE_LEN,
        "aes-ctr",
    )?;
    apply_layer::<MiddleCipher>(
        keys.middle(),
        &mut buf[MIDDLE_AT..],
        MIDDLE_NONCE_LEN,
        "twofish-ctr",
    )?;
    apply_layer::<InnerCipher>(
        keys.inner()?,
        &mut buf[INNER_AT..],
        INNER_NONCE_LEN,
        "xsalsa20",
    )?;

    let plain_len = data.len() - NONCES_LEN;
    buf.copy_within(NONCES_LEN.., 0);
    buf.truncate(plain_len);

    if buf.len() != plain_len {
        return Err(Error::InternalFault("plaintext size is not consistent"));
    }

    Ok(buf)
}
