//! Address primitives for the Portals client.
//!
//! This crate provides the account-address handling the payment flow relies on:
//!
//! - **Addresses**: 32-byte account keys with a base58 text form
//! - **Program derived addresses**: deterministic off-curve addresses
//!   computed from seeds and an owning program
//! - **Associated token accounts**: the canonical token-holding account for an
//!   owner and mint, which is where stablecoin transfers actually land
//!
//! # Example
//!
//! ```
//! use portals_crypto::{associated_token_address, Address, USDC_MINT_MAINNET};
//!
//! let vault: Address = "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2".parse().unwrap();
//! let mint: Address = USDC_MINT_MAINNET.parse().unwrap();
//!
//! let ata = associated_token_address(&vault, &mint).unwrap();
//! assert_eq!(ata.to_string(), "E7NuY4h3WV7H1xBZ5j3mAA2HmuWkJcxuN9kwuPnTxzXA");
//! ```

mod error;
mod pda;
mod serde_impl;
mod token;

pub use error::CryptoError;
pub use pda::{create_program_address, find_program_address, is_on_curve, MAX_SEEDS, MAX_SEED_LEN};
pub use token::{
    associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID, USDC_MINT_DEVNET,
    USDC_MINT_MAINNET,
};

use std::str::FromStr;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address.
///
/// Displayed and parsed as base58. Any 32-byte value is a valid address; it
/// may or may not lie on the ed25519 curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create an address from a byte slice, which must be exactly 32 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: ADDRESS_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Canonical base58 form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
        Self::try_from_slice(&decoded)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}
