//! Account filter for registry entries.
//!
//! Entry accounts are allocated at a fixed size and begin with an 8-byte
//! account discriminator. Both are checked before an account is treated as an
//! entry; the same pair is also expressed in JSON-RPC `filters` form so a node
//! can apply it server-side.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::record::{DISCRIMINATOR_LEN, MIN_ENTRY_SIZE};

/// Longest title the registry program accepts.
pub const MAX_TITLE_LEN: usize = 64;

/// Longest description the registry program accepts.
pub const MAX_DESCRIPTION_LEN: usize = 512;

/// Longest URL the registry program accepts.
pub const MAX_URL_LEN: usize = 256;

/// Allocated size of every entry account.
pub const API_ENTRY_SIZE: usize = MIN_ENTRY_SIZE + MAX_TITLE_LEN + MAX_DESCRIPTION_LEN + MAX_URL_LEN;

/// `sha256("account:ApiEntry")[..8]`
pub const API_ENTRY_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [205, 190, 61, 193, 127, 194, 237, 17];

/// Compute the discriminator for an account type name.
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = Sha256::digest(format!("account:{}", type_name).as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    out
}

/// Exact-size plus discriminator-prefix match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFilter {
    /// Required account data length.
    pub data_size: usize,
    /// Required first 8 bytes.
    pub discriminator: [u8; DISCRIMINATOR_LEN],
}

impl Default for RegistryFilter {
    fn default() -> Self {
        Self {
            data_size: API_ENTRY_SIZE,
            discriminator: API_ENTRY_DISCRIMINATOR,
        }
    }
}

impl RegistryFilter {
    /// Returns true if the account data looks like a registry entry.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() == self.data_size && data.starts_with(&self.discriminator)
    }

    /// The filter as a `getProgramAccounts` `filters` array.
    pub fn to_rpc_filters(&self) -> Value {
        json!([
            { "dataSize": self.data_size },
            {
                "memcmp": {
                    "offset": 0,
                    "bytes": bs58::encode(self.discriminator).into_string(),
                }
            }
        ])
    }
}
