//! Where registry account bytes come from.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use portals_crypto::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};

/// Default HTTP timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches raw account data by address.
///
/// Implementations must return fresh data on every call.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the account data, or `None` if the account does not exist.
    async fn fetch_account(&self, address: &Address) -> RegistryResult<Option<Vec<u8>>>;
}

/// JSON-RPC `getAccountInfo` over HTTP.
#[derive(Clone)]
pub struct RpcRecordSource {
    client: Client,
    endpoint: String,
}

impl RpcRecordSource {
    /// Create a source that talks to the given RPC endpoint.
    pub fn new(endpoint: &str) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::Rpc(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// RPC endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSource for RpcRecordSource {
    async fn fetch_account(&self, address: &Address) -> RegistryResult<Option<Vec<u8>>> {
        debug!(endpoint = %self.endpoint, address = %address, "Fetching registry account");

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [
                address.to_base58(),
                { "encoding": "base64", "commitment": "confirmed" }
            ]
        });

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Rpc(format!("RPC returned {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RegistryError::Rpc(format!("invalid RPC response: {}", e)))?;

        parse_account_info(body)
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<AccountInfoResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct AccountInfoResult {
    value: Option<AccountInfo>,
}

#[derive(Deserialize)]
struct AccountInfo {
    /// `[payload, encoding]`
    data: (String, String),
}

/// Extract account bytes from a `getAccountInfo` response body.
pub fn parse_account_info(body: Value) -> RegistryResult<Option<Vec<u8>>> {
    let response: RpcResponse = serde_json::from_value(body)
        .map_err(|e| RegistryError::Rpc(format!("unexpected RPC response shape: {}", e)))?;

    if let Some(err) = response.error {
        return Err(RegistryError::Rpc(format!("{} (code {})", err.message, err.code)));
    }

    let result = response
        .result
        .ok_or_else(|| RegistryError::Rpc("RPC response has neither result nor error".to_string()))?;

    let Some(account) = result.value else {
        return Ok(None);
    };

    let (payload, encoding) = account.data;
    if encoding != "base64" {
        return Err(RegistryError::Rpc(format!("unexpected account encoding: {}", encoding)));
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| RegistryError::Rpc(format!("invalid base64 account data: {}", e)))?;

    Ok(Some(bytes))
}
