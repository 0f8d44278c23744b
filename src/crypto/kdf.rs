use scrypt::Params;
use zeroize::Zeroize;

use super::{CIPHER_KEY_LEN, DERIVED_KEY_LEN, MAC_KEY_LEN, SALT_LEN};
use crate::error::{Error, Result};

// scrypt only consults this for PHC output; the real length comes from the
// output buffer.
const PARAMS_OUTPUT_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // N = 2^15
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log_n, r, p };
        params.validate()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_n == 0 || self.log_n > 30 {
            return Err(Error::InvalidInput("scrypt log_n must be in 1..=30"));
        }
        if self.r < 1 {
            return Err(Error::InvalidInput("scrypt r must be >= 1"));
        }
        if self.p < 1 {
            return Err(Error::InvalidInput("scrypt p must be >= 1"));
        }
        if u32::from(self.log_n) >= self.r.saturating_mul(16) {
            return Err(Error::InvalidInput("scrypt N must be below 2^(16 * r)"));
        }
        if u64::from(self.r) * u64::from(self.p) >= 1 << 30 {
            return Err(Error::InvalidInput("scrypt r * p must be below 2^30"));
        }
        Ok(())
    }
}

/// The 192-byte scrypt output, split into the five subkeys.
///
/// Wiped on drop. Offsets are fixed: `mac1 | mac2 | outer | middle | inner`.
pub struct DerivedKeys {
    block: [u8; DERIVED_KEY_LEN],
}

impl DerivedKeys {
    const MAC1: usize = 0;
    const MAC2: usize = Self::MAC1 + MAC_KEY_LEN;
    const OUTER: usize = Self::MAC2 + MAC_KEY_LEN;
    const MIDDLE: usize = Self::OUTER + CIPHER_KEY_LEN;
    const INNER: usize = Self::MIDDLE + CIPHER_KEY_LEN;
    const END: usize = Self::INNER + CIPHER_KEY_LEN;

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_LEN] {
        &self.block
    }

    pub fn mac1(&self) -> &[u8] {
        &self.block[Self::MAC1..Self::MAC2]
    }

    pub fn mac2(&self) -> &[u8] {
        &self.block[Self::MAC2..Self::OUTER]
    }

    pub fn outer(&self) -> &[u8] {
        &self.block[Self::OUTER..Self::MIDDLE]
    }

    pub fn middle(&self) -> &[u8] {
        &self.block[Self::MIDDLE..Self::INNER]
    }

    pub fn inner(&self) -> Result<&[u8; CIPHER_KEY_LEN]> {
        self.block[Self::INNER..Self::END]
            .try_into()
            .map_err(|_| Error::InternalFault("inner cipher key is not 32 bytes"))
    }
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.block.zeroize();
    }
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys")
            .field("block", &"[REDACTED]")
            .finish()
    }
}

const _: () = assert!(DerivedKeys::END == DERIVED_KEY_LEN);

/// Stretch `passphrase` and `salt` into the five subkeys with scrypt.
///
/// Deterministic in `(passphrase, salt, kdf)`.
pub fn derive_keys(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    kdf: KdfParams,
) -> Result<DerivedKeys> {
    kdf.validate()?;

    let params = Params::new(kdf.log_n, kdf.r, kdf.p, PARAMS_OUTPUT_LEN)
        .map_err(|_| Error::InternalFault("failed to construct scrypt params"))?;

    let mut keys = DerivedKeys {
        block: [0u8; DERIVED_KEY_LEN],
    };
    scrypt::scrypt(passphrase, salt, &params, &mut keys.block)
        .map_err(|_| Error::InternalFault("scrypt key derivation failed"))?;

    Ok(keys)
}
