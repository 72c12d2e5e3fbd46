//! Error types for portals-crypto

use thiserror::Error;

/// Errors that can occur in address operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid base58 encoding
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Too many seeds, or a seed longer than 32 bytes
    #[error("Max seed length exceeded")]
    MaxSeedLengthExceeded,

    /// The derived address landed on the curve
    #[error("Provided seeds do not result in a valid address")]
    InvalidSeeds,

    /// No bump in 255..=0 produced an off-curve address
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,
}
