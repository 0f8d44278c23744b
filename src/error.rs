use thiserror::Error;

/// Errors returned by [`Cipher`](crate::Cipher) operations.
///
/// Every failure is terminal for the call that produced it. None of them is
/// transient, so retrying the same input cannot succeed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The caller passed an empty passphrase, empty plaintext, a destination
    /// buffer that is too small, or out-of-range KDF parameters.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The input is not a TripleSec envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// The envelope carries a version this crate does not speak.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u32),

    /// Wrong passphrase or tampered envelope. Which of the two MACs failed is
    /// deliberately not reported.
    #[error("bad passphrase (or inflight message tampering)")]
    AuthenticationFailure,

    /// A broken invariant inside the implementation or an unavailable OS
    /// random source.
    #[error("internal fault: {0}")]
    InternalFault(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
