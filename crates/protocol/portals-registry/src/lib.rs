//! On-chain API registry for the Portals client.
//!
//! Each published API has one registry entry account. This crate decodes the
//! entry's binary layout into a [`RegistryRecord`] and looks entries up
//! through a pluggable [`RecordSource`] (JSON-RPC by default).
//!
//! ```
//! use portals_crypto::Address;
//! use portals_registry::{decode_record, encode_record, RegistryRecord, API_ENTRY_DISCRIMINATOR};
//!
//! let record = RegistryRecord {
//!     address: Address([1; 32]),
//!     provider: Address([2; 32]),
//!     title: "Weather".into(),
//!     description: "Forecasts".into(),
//!     url: "https://weather.example.com".into(),
//!     payment_vault: Address([3; 32]),
//!     collateral_vault: Address([4; 32]),
//!     collateral_amount: 1_000_000,
//!     total_claimed: 0,
//!     suspended: false,
//!     created_at: 1_700_000_000,
//!     last_updated: 1_700_000_000,
//! };
//!
//! let bytes = encode_record(&record, API_ENTRY_DISCRIMINATOR).unwrap();
//! assert_eq!(decode_record(&bytes, record.address).unwrap(), record);
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod record;
pub mod source;

pub use client::RegistryClient;
pub use error::{DecodeError, EncodeError, RegistryError, RegistryResult};
pub use filter::{account_discriminator, RegistryFilter, API_ENTRY_DISCRIMINATOR, API_ENTRY_SIZE};
pub use record::{decode_record, encode_record, RegistryRecord, DISCRIMINATOR_LEN, MIN_ENTRY_SIZE};
pub use source::{parse_account_info, RecordSource, RpcRecordSource};
