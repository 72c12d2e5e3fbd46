//! Error types for portals-types

use thiserror::Error;

/// Errors from parsing shared types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Unknown network cluster name.
    #[error("unknown network '{0}': expected 'devnet' or 'mainnet-beta'")]
    UnknownNetwork(String),
}
