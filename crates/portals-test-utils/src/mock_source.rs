//! Mock implementation of the `RecordSource` trait for testing.

use async_trait::async_trait;
use portals_crypto::Address;
use portals_registry::{
    encode_record, RecordSource, RegistryError, RegistryRecord, RegistryResult,
    API_ENTRY_DISCRIMINATOR,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

struct MockRecordSourceInner {
    accounts: HashMap<Address, Vec<u8>>,
    fetches: Vec<Address>,
    should_fail: bool,
}

/// In-memory account store. Clones share state.
#[derive(Clone)]
pub struct MockRecordSource {
    inner: Arc<RwLock<MockRecordSourceInner>>,
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordSource {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockRecordSourceInner {
                accounts: HashMap::new(),
                fetches: Vec::new(),
                should_fail: false,
            })),
        }
    }

    /// Store an encoded record at its own address.
    pub fn with_record(self, record: &RegistryRecord) -> Self {
        let data = encode_record(record, API_ENTRY_DISCRIMINATOR)
            .expect("fixture strings fit a u32 length prefix");
        self.set_account(record.address, data);
        self
    }

    /// Store raw account bytes.
    pub fn with_account(self, address: Address, data: Vec<u8>) -> Self {
        self.set_account(address, data);
        self
    }

    /// Fail every fetch with an RPC error.
    pub fn with_failure(self) -> Self {
        self.inner.write().unwrap().should_fail = true;
        self
    }

    /// Replace account bytes at runtime.
    pub fn set_account(&self, address: Address, data: Vec<u8>) {
        self.inner.write().unwrap().accounts.insert(address, data);
    }

    /// Addresses fetched, in order.
    pub fn fetches(&self) -> Vec<Address> {
        self.inner.read().unwrap().fetches.clone()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_account(&self, address: &Address) -> RegistryResult<Option<Vec<u8>>> {
        let mut inner = self.inner.write().unwrap();
        inner.fetches.push(*address);

        if inner.should_fail {
            return Err(RegistryError::Rpc("mock RPC failure".to_string()));
        }

        Ok(inner.accounts.get(address).cloned())
    }
}
