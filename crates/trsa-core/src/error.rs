//! Error types for threshold RSA operations

use thiserror::Error;

/// Result type alias for threshold RSA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, signing or combining
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid threshold, group size, bit size or public exponent
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Not enough signature shares to combine
    #[error("Threshold not met: required {required}, got {actual}")]
    ThresholdNotMet { required: usize, actual: usize },

    /// Two signature shares carry the same id
    #[error("Duplicate share id: {0}")]
    DuplicateShareId(u16),

    /// Share id outside `[1, l]`
    #[error("Invalid share id: {0}")]
    InvalidShareId(u16),

    /// Wire blob could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Wire blob was produced by an incompatible library version
    #[error("Format version mismatch: message={actual}, library={expected}")]
    VersionMismatch { expected: u16, actual: u16 },

    /// Arithmetic that the protocol guarantees to succeed did not
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}
