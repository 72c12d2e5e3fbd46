//! HTTP access to the paid API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use portals_types::constants::HEADER_PAYMENT;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Transport-level failure, before any status code is known.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self(e.to_string())
    }
}

/// A response from the paid API, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Response headers, names lower-cased
    pub headers: BTreeMap<String, String>,
    /// Raw body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Response with a status and body and no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Body as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Body as JSON, falling back to a JSON string of the text.
    pub fn json_or_text(&self) -> Value {
        self.json()
            .unwrap_or_else(|| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

/// The two HTTP operations a negotiation needs.
///
/// Implementations do not enforce timeouts; the negotiator does.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET a JSON document.
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;

    /// POST JSON params, optionally with an `X-PAYMENT` proof. Any status is
    /// returned as a response.
    async fn post_json(
        &self,
        url: &str,
        params: &Value,
        payment: Option<&str>,
    ) -> Result<ApiResponse, TransportError>;
}

/// [`ApiTransport`] over reqwest.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TransportError(format!("status {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| TransportError(format!("invalid JSON: {}", e)))
    }

    async fn post_json(
        &self,
        url: &str,
        params: &Value,
        payment: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        debug!(url = %url, paid = payment.is_some(), "POST");

        let mut request = self.client.post(url).json(params);
        if let Some(proof) = payment {
            request = request.header(HEADER_PAYMENT, proof);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(url = %url, status, bytes = body.len(), "Response");
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_case_insensitive() {
        let response = ApiResponse::new(402, "").with_header("X402-Amount", "0.05");
        assert_eq!(response.header("x402-amount"), Some("0.05"));
        assert_eq!(response.header("X402-AMOUNT"), Some("0.05"));
        assert_eq!(response.header("x402-address"), None);
    }

    #[test]
    fn test_json_or_text() {
        let json = ApiResponse::new(200, r#"{"temp": 21}"#);
        assert_eq!(json.json_or_text()["temp"], 21);

        let text = ApiResponse::new(200, "plain text");
        assert_eq!(text.json_or_text(), Value::String("plain text".into()));
    }
}
