//! Cryptographic primitives for the envelope.
//!
//! Provides key derivation, the three-layer cipher cascade and the dual MAC.

pub mod kdf;
pub mod layers;
pub mod mac;

pub use kdf::{KdfParams, derive_keys};
pub use layers::{decrypt_layers, encrypt_layers, generate_salt};
pub use mac::{compute_macs, verify_macs};

/// Length of the scrypt salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of each HMAC key (48 bytes).
pub const MAC_KEY_LEN: usize = 48;
/// Length of each HMAC output (64 bytes / 512 bits).
pub const MAC_LEN: usize = 64;
/// Length of each cipher key (32 bytes / 256 bits).
pub const CIPHER_KEY_LEN: usize = 32;
/// Total scrypt output: two MAC keys followed by three cipher keys.
pub const DERIVED_KEY_LEN: usize = 2 * MAC_KEY_LEN + 3 * CIPHER_KEY_LEN;

/// Nonce of the outer AES-256-CTR layer.
pub const OUTER_NONCE_LEN: usize = 16;
/// Nonce of the middle Twofish-256-CTR layer.
pub const MIDDLE_NONCE_LEN: usize = 16;
/// Nonce of the inner XSalsa20 layer.
pub const INNER_NONCE_LEN: usize = 24;
/// Bytes the cascade adds in front of the ciphertext.
pub const NONCES_LEN: usize = OUTER_NONCE_LEN + MIDDLE_NONCE_LEN + INNER_NONCE_LEN;
