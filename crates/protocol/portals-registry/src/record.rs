//! Registry entry layout and decoding.
//!
//! # Layout
//!
//! ```text
//! [discriminator: 8 bytes]        # account type tag (skipped)
//! [provider: 32 bytes]
//! [title_len: u32 LE][title: UTF-8]
//! [desc_len: u32 LE][description: UTF-8]
//! [url_len: u32 LE][url: UTF-8]
//! [payment_vault: 32 bytes]
//! [collateral_vault: 32 bytes]
//! [collateral_amount: u64 LE]
//! [total_claimed: u64 LE]
//! [suspended: u8]                 # 1 = true, anything else = false
//! [created_at: i64 LE]
//! [last_updated: i64 LE]
//! ```
//!
//! Accounts are allocated at a fixed maximum size, so bytes after
//! `last_updated` are padding and ignored.

use portals_crypto::{Address, ADDRESS_LENGTH};
use portals_types::{Amount, UnixTimestamp};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

/// Length of the leading account discriminator.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Smallest possible entry: every fixed field plus three empty strings.
///
/// discriminator(8) + provider(32) + 3 * len(4) + vaults(64) + amounts(16)
/// + suspended(1) + timestamps(16) = 149
pub const MIN_ENTRY_SIZE: usize =
    DISCRIMINATOR_LEN + ADDRESS_LENGTH + 3 * 4 + 2 * ADDRESS_LENGTH + 2 * 8 + 1 + 2 * 8;

/// One published API as recorded on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRecord {
    /// Address of the registry entry itself.
    pub address: Address,
    /// Provider that published the API.
    pub provider: Address,
    /// Human-readable title.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Callable base URL.
    pub url: String,
    /// Where payments for this API must land.
    pub payment_vault: Address,
    /// Vault holding the provider's collateral.
    pub collateral_vault: Address,
    /// Collateral posted, in minor units.
    pub collateral_amount: Amount,
    /// Collateral claimed so far, in minor units.
    pub total_claimed: Amount,
    /// Whether the registry has suspended this API.
    pub suspended: bool,
    /// Creation time (Unix seconds).
    pub created_at: UnixTimestamp,
    /// Last update time (Unix seconds).
    pub last_updated: UnixTimestamp,
}

/// Bounds-checked little-endian reader over an account buffer.
struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.bytes.len().saturating_sub(self.cursor);
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::Truncated {
                field,
                offset: self.cursor,
                needed: len,
                available,
            })?;
        let slice = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let offset = self.cursor;
        let slice = self.take(field, N)?;
        slice.try_into().map_err(|_| DecodeError::Truncated {
            field,
            offset,
            needed: N,
            available: slice.len(),
        })
    }

    fn address(&mut self, field: &'static str) -> Result<Address, DecodeError> {
        Ok(Address(self.array::<ADDRESS_LENGTH>(field)?))
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array::<4>(field)?))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.array::<8>(field)?))
    }

    fn i64(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.array::<8>(field)?))
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.array::<1>(field)?[0])
    }

    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.u32(field)? as usize;
        let raw = self.take(field, len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

/// Decode a registry entry from raw account data.
///
/// The discriminator is skipped, not checked: callers that scan accounts
/// should apply [`crate::RegistryFilter`] first.
pub fn decode_record(data: &[u8], address: Address) -> Result<RegistryRecord, DecodeError> {
    if data.len() < MIN_ENTRY_SIZE {
        return Err(DecodeError::BufferTooShort {
            expected: MIN_ENTRY_SIZE,
            actual: data.len(),
        });
    }

    let mut r = Reader::new(data);
    r.take("discriminator", DISCRIMINATOR_LEN)?;

    let provider = r.address("provider")?;
    let title = r.string("title")?;
    let description = r.string("description")?;
    let url = r.string("url")?;
    let payment_vault = r.address("payment_vault")?;
    let collateral_vault = r.address("collateral_vault")?;
    let collateral_amount = r.u64("collateral_amount")?;
    let total_claimed = r.u64("total_claimed")?;
    let suspended = r.u8("suspended")? == 1;
    let created_at = r.i64("created_at")?;
    let last_updated = r.i64("last_updated")?;

    Ok(RegistryRecord {
        address,
        provider,
        title,
        description,
        url,
        payment_vault,
        collateral_vault,
        collateral_amount,
        total_claimed,
        suspended,
        created_at,
        last_updated,
    })
}

/// Encode a registry entry in account layout.
///
/// The inverse of [`decode_record`]; used to build fixtures and by tooling
/// that prepares entries for submission. Fails if a string does not fit its
/// `u32` length prefix.
pub fn encode_record(
    record: &RegistryRecord,
    discriminator: [u8; DISCRIMINATOR_LEN],
) -> Result<Vec<u8>, EncodeError> {
    let strings_len = record.title.len() + record.description.len() + record.url.len();
    let mut buf = Vec::with_capacity(MIN_ENTRY_SIZE + strings_len);

    buf.extend_from_slice(&discriminator);
    buf.extend_from_slice(record.provider.as_bytes());
    for (field, s) in [
        ("title", &record.title),
        ("description", &record.description),
        ("url", &record.url),
    ] {
        buf.extend_from_slice(&length_prefix(field, s.len())?);
        buf.extend_from_slice(s.as_bytes());
    }
    buf.extend_from_slice(record.payment_vault.as_bytes());
    buf.extend_from_slice(record.collateral_vault.as_bytes());
    buf.extend_from_slice(&record.collateral_amount.to_le_bytes());
    buf.extend_from_slice(&record.total_claimed.to_le_bytes());
    buf.push(u8::from(record.suspended));
    buf.extend_from_slice(&record.created_at.to_le_bytes());
    buf.extend_from_slice(&record.last_updated.to_le_bytes());

    Ok(buf)
}

fn length_prefix(field: &'static str, len: usize) -> Result<[u8; 4], EncodeError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| EncodeError::FieldTooLong { field, len })
}
