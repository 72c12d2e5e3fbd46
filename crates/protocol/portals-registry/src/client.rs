//! Registry lookup.

use std::sync::Arc;

use portals_crypto::Address;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::record::{decode_record, RegistryRecord};
use crate::source::RecordSource;

/// Resolves API ids to decoded registry records.
///
/// Every lookup goes to the source; records are never cached.
#[derive(Clone)]
pub struct RegistryClient {
    source: Arc<dyn RecordSource>,
}

impl RegistryClient {
    /// Create a client over the given account source.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Fetch and decode the entry at `address`.
    pub async fn get_api(&self, address: &Address) -> RegistryResult<RegistryRecord> {
        let data = self
            .source
            .fetch_account(address)
            .await?
            .ok_or_else(|| RegistryError::RecordNotFound {
                address: address.to_string(),
            })?;

        let record = decode_record(&data, *address)?;
        debug!(
            address = %address,
            title = %record.title,
            url = %record.url,
            "Decoded registry entry"
        );

        if record.suspended {
            warn!(address = %address, "Registry entry is suspended");
        }

        Ok(record)
    }

    /// Same as [`get_api`](Self::get_api) for a base58 id.
    pub async fn get_api_str(&self, api_id: &str) -> RegistryResult<RegistryRecord> {
        let address: Address = api_id.parse().map_err(|e: portals_crypto::CryptoError| {
            RegistryError::InvalidAddress {
                id: api_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.get_api(&address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::API_ENTRY_DISCRIMINATOR;
    use crate::record::encode_record;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapSource(HashMap<Address, Vec<u8>>);

    #[async_trait]
    impl RecordSource for MapSource {
        async fn fetch_account(&self, address: &Address) -> RegistryResult<Option<Vec<u8>>> {
            Ok(self.0.get(address).cloned())
        }
    }

    fn record(address: Address) -> RegistryRecord {
        RegistryRecord {
            address,
            provider: Address([7; 32]),
            title: "t".into(),
            description: "d".into(),
            url: "https://api.example.com".into(),
            payment_vault: Address([8; 32]),
            collateral_vault: Address([9; 32]),
            collateral_amount: 1,
            total_claimed: 0,
            suspended: true,
            created_at: 1,
            last_updated: 2,
        }
    }

    #[tokio::test]
    async fn test_get_api_found() {
        let addr = Address([1; 32]);
        let expected = record(addr);
        let mut map = HashMap::new();
        map.insert(addr, encode_record(&expected, API_ENTRY_DISCRIMINATOR).unwrap());
        let client = RegistryClient::new(Arc::new(MapSource(map)));

        assert_eq!(client.get_api(&addr).await.unwrap(), expected);
        assert_eq!(client.get_api_str(&addr.to_string()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_get_api_not_found() {
        let client = RegistryClient::new(Arc::new(MapSource(HashMap::new())));
        let err = client.get_api(&Address([1; 32])).await.unwrap_err();
        assert!(matches!(err, RegistryError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_api_undecodable() {
        let addr = Address([1; 32]);
        let mut map = HashMap::new();
        map.insert(addr, vec![0u8; 10]);
        let client = RegistryClient::new(Arc::new(MapSource(map)));

        let err = client.get_api(&addr).await.unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_api_str_invalid() {
        let client = RegistryClient::new(Arc::new(MapSource(HashMap::new())));
        let err = client.get_api_str("not-an-address").await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));
    }
}
