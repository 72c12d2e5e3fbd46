//! Core types for the Portals client.
//!
//! - [`constants`]: payment bounds, tolerances, timeouts and x402 wire names
//! - [`network`]: per-cluster addresses (USDC mint, registry program, RPC)
//! - [`amount`]: conversion between decimal USDC and integer micro-units

pub mod amount;
pub mod constants;
pub mod error;
pub mod network;

pub use amount::{format_usdc, from_minor_units, to_minor_units};
pub use error::TypesError;
pub use network::{Network, NetworkConfig};

/// Token amount in minor units (micro-USDC for a 6-decimal mint).
pub type Amount = u64;

/// Seconds since Unix epoch, as stored on-chain.
pub type UnixTimestamp = i64;
