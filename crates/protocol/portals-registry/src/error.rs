//! Error types for registry decoding and lookup.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while decoding a raw registry account buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer cannot even hold the fixed-width fields.
    #[error("registry buffer too short: need at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Minimum size of an entry
        expected: usize,
        /// Actual buffer size
        actual: usize,
    },

    /// A field (or a string's declared length) runs past the end of the buffer.
    #[error("registry buffer truncated reading {field}: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Field being read
        field: &'static str,
        /// Offset of the read
        offset: usize,
        /// Bytes the field requires
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// A string field is not valid UTF-8.
    #[error("registry field {field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Field being read
        field: &'static str,
    },
}

/// Errors raised while encoding a registry entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A string is longer than its `u32` length prefix can express.
    #[error("registry field {field} is {len} bytes, more than a u32 length prefix allows")]
    FieldTooLong {
        /// Field being written
        field: &'static str,
        /// Byte length of the string
        len: usize,
    },
}

/// Errors that can occur during registry lookups.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The account does not exist or holds no data.
    #[error("API not found: {address}")]
    RecordNotFound {
        /// Registry entry address that was looked up
        address: String,
    },

    /// The account exists but its data is not a valid entry.
    #[error("failed to decode registry entry: {0}")]
    Decode(#[from] DecodeError),

    /// The supplied API id is not an address.
    #[error("invalid API id '{id}': {reason}")]
    InvalidAddress {
        /// Text that failed to parse
        id: String,
        /// Parser message
        reason: String,
    },

    /// JSON-RPC transport or protocol failure.
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl RegistryError {
    /// Returns true if retrying the lookup might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Rpc(e.to_string())
    }
}
