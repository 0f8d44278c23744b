//! TripleSec v3: passphrase encryption through three ciphers and two MACs.
//!
//! ```text
//! scrypt(passphrase, salt) -> mac1 (48) | mac2 (48) | aes (32) | twofish (32) | xsalsa20 (32)
//! envelope = MAGIC | VERSION | SALT | HMAC-SHA512 | HMAC-KECCAK512 | AES-CTR(TWOFISH-CTR(XSALSA20(plaintext)))
//! ```
//!
//! Decryption always verifies both MACs before any cipher layer is peeled.

mod crypto;
mod error;
mod format;

pub use crate::crypto::{DERIVED_KEY_LEN, KdfParams, MAC_LEN, SALT_LEN};
pub use crate::error::{Error, Result};
pub use crate::format::{
    CURRENT_VERSION as VERSION, MAGIC, OVERHEAD, envelope_len, plaintext_len,
};

use tracing::{debug, warn};
use zeroize::Zeroizing;

/// A passphrase plus the scrypt work factor used to stretch it.
///
/// Immutable after construction and safe to share across threads; every call
/// derives its own keys, nonces and buffers.
pub struct Cipher {
    passphrase: Zeroizing<Vec<u8>>,
    kdf: KdfParams,
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher")
            .field("passphrase", &"[REDACTED]")
            .field("kdf", &self.kdf)
            .finish()
    }
}

impl Cipher {
    /// Creates a cipher with the standard v3 work factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `passphrase` is empty.
    pub fn new(passphrase: &[u8]) -> Result<Self> {
        Self::with_kdf_params(passphrase, KdfParams::default())
    }

    /// Creates a cipher with a custom scrypt work factor.
    ///
    /// The work factor is not recorded in the envelope, so anything encrypted
    /// with non-default parameters only decrypts under the same parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `passphrase` is empty or `kdf` is
    /// out of range.
    pub fn with_kdf_params(passphrase: &[u8], kdf: KdfParams) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(Error::InvalidInput("the passphrase cannot be empty"));
        }
        kdf.validate()?;

        Ok(Self {
            passphrase: Zeroizing::new(passphrase.to_vec()),
            kdf,
        })
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    /// Encrypts `plaintext` into a fresh envelope of
    /// `plaintext.len() + OVERHEAD` bytes.
    ///
    /// Every call draws a new salt and three new nonces.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(Error::InvalidInput("the plaintext cannot be empty"));
        }
        debug!(len = plaintext.len(), "encrypting");

        let salt = crypto::generate_salt()?;
        let keys = crypto::derive_keys(&self.passphrase, &salt, self.kdf)?;

        let layered = crypto::encrypt_layers(&keys, plaintext)?;
        let authenticated = format::authenticated_data(&salt, &layered);
        let (mac1, mac2) = crypto::compute_macs(&authenticated, keys.mac1(), keys.mac2())?;

        let envelope = format::serialize(&salt, &mac1, &mac2, &layered);
        if envelope.len() != envelope_len(plaintext.len()) {
            return Err(Error::InternalFault("output size is not consistent"));
        }

        debug!(len = envelope.len(), "encrypted");
        Ok(envelope)
    }

    /// Encrypts into `dst`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `dst` is shorter than
    /// `plaintext.len() + OVERHEAD`. `dst` is untouched on any error.
    pub fn encrypt_into(&self, dst: &mut [u8], plaintext: &[u8]) -> Result<usize> {
        if dst.len() < envelope_len(plaintext.len()) {
            return Err(Error::InvalidInput(
                "the destination is shorter than the plaintext plus overhead",
            ));
        }

        let envelope = self.encrypt(plaintext)?;
        dst[..envelope.len()].copy_from_slice(&envelope);
        Ok(envelope.len())
    }

    /// Authenticates and decrypts an envelope.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedEnvelope`] if `envelope` is too short or has the
    ///   wrong magic bytes
    /// - [`Error::UnsupportedVersion`] for any version other than 3
    /// - [`Error::AuthenticationFailure`] on a wrong passphrase or any
    ///   tampering; no plaintext is produced in that case
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        debug!(len = envelope.len(), "decrypting");

        let parsed = format::parse(envelope).inspect_err(|e| {
            if let Error::UnsupportedVersion(v) = e {
                warn!(version = v, "unsupported envelope version");
            }
        })?;

        let keys = crypto::derive_keys(&self.passphrase, parsed.salt(), self.kdf)?;

        let authenticated = parsed.authenticated_data();
        if !crypto::verify_macs(
            &authenticated,
            parsed.mac1(),
            parsed.mac2(),
            keys.mac1(),
            keys.mac2(),
        )? {
            warn!("envelope authentication failed");
            return Err(Error::AuthenticationFailure);
        }

        let plaintext = crypto::decrypt_layers(&keys, parsed.layered())?;
        if Some(plaintext.len()) != plaintext_len(envelope.len()) {
            return Err(Error::InternalFault("buffer size is not consistent"));
        }

        debug!(len = plaintext.len(), "decrypted");
        Ok(plaintext)
    }

    /// Decrypts into `dst`, returning the plaintext length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `dst` cannot hold
    /// `envelope.len() - OVERHEAD` bytes, plus everything
    /// [`decrypt`](Self::decrypt) returns. `dst` is untouched on any error.
    pub fn decrypt_into(&self, dst: &mut [u8], envelope: &[u8]) -> Result<usize> {
        if plaintext_len(envelope.len()).is_some_and(|n| dst.len() < n) {
            return Err(Error::InvalidInput(
                "the dst buffer is too short to hold the plaintext",
            ));
        }

        let plaintext = self.decrypt(envelope)?;
        dst[..plaintext.len()].copy_from_slice(&plaintext);
        Ok(plaintext.len())
    }
}
