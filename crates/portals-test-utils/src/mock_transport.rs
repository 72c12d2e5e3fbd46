//! Mock implementation of the `ApiTransport` trait for testing.
//!
//! Serves a fixed schema document and a queue of scripted call responses,
//! and records every request it sees.

use async_trait::async_trait;
use portals_x402::{ApiResponse, ApiTransport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// One `post_json` call as the transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Target URL
    pub url: String,
    /// JSON params
    pub params: Value,
    /// `X-PAYMENT` header, if sent
    pub payment: Option<String>,
}

struct MockTransportInner {
    /// Document returned by `get_json`, or the failure to report.
    schema: Result<Value, String>,
    /// Scripted responses with their own delay, served in order.
    responses: VecDeque<(Result<ApiResponse, String>, Option<Duration>)>,
    /// Delay before answering `get_json`.
    schema_delay: Option<Duration>,
    /// Delay before answering `post_json`.
    call_delay: Option<Duration>,
    /// URLs passed to `get_json`.
    schema_requests: Vec<String>,
    /// Calls passed to `post_json`.
    calls: Vec<RecordedCall>,
}

/// A mock transport. Clones share state.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<RwLock<MockTransportInner>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Transport serving an empty OpenAPI document and no responses.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockTransportInner {
                schema: Ok(serde_json::json!({ "openapi": "3.0.0", "paths": {} })),
                responses: VecDeque::new(),
                schema_delay: None,
                call_delay: None,
                schema_requests: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Serve this schema document.
    pub fn with_schema(self, schema: Value) -> Self {
        self.inner.write().unwrap().schema = Ok(schema);
        self
    }

    /// Fail schema fetches.
    pub fn with_schema_failure(self, reason: &str) -> Self {
        self.inner.write().unwrap().schema = Err(reason.to_string());
        self
    }

    /// Queue a response for the next call.
    pub fn with_response(self, response: ApiResponse) -> Self {
        self.inner.write().unwrap().responses.push_back((Ok(response), None));
        self
    }

    /// Queue a response that takes `delay` to arrive.
    pub fn with_delayed_response(self, response: ApiResponse, delay: Duration) -> Self {
        self.inner
            .write()
            .unwrap()
            .responses
            .push_back((Ok(response), Some(delay)));
        self
    }

    /// Queue a transport failure for the next call.
    pub fn with_call_failure(self, reason: &str) -> Self {
        self.inner
            .write()
            .unwrap()
            .responses
            .push_back((Err(reason.to_string()), None));
        self
    }

    /// Delay schema fetches.
    pub fn with_schema_delay(self, delay: Duration) -> Self {
        self.inner.write().unwrap().schema_delay = Some(delay);
        self
    }

    /// Delay every call without its own delay.
    pub fn with_call_delay(self, delay: Duration) -> Self {
        self.inner.write().unwrap().call_delay = Some(delay);
        self
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.read().unwrap().calls.clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.inner.read().unwrap().calls.len()
    }

    /// All schema URLs requested.
    pub fn schema_requests(&self) -> Vec<String> {
        self.inner.read().unwrap().schema_requests.clone()
    }

    /// Scripted responses not yet served.
    pub fn remaining_responses(&self) -> usize {
        self.inner.read().unwrap().responses.len()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let (delay, schema) = {
            let mut inner = self.inner.write().unwrap();
            inner.schema_requests.push(url.to_string());
            (inner.schema_delay, inner.schema.clone())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        schema.map_err(TransportError)
    }

    async fn post_json(
        &self,
        url: &str,
        params: &Value,
        payment: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        let (delay, next) = {
            let mut inner = self.inner.write().unwrap();
            inner.calls.push(RecordedCall {
                url: url.to_string(),
                params: params.clone(),
                payment: payment.map(str::to_string),
            });
            (inner.call_delay, inner.responses.pop_front())
        };

        let (result, own_delay) = match next {
            Some((result, own_delay)) => (result, own_delay),
            None => (Err("no scripted response".to_string()), None),
        };

        if let Some(delay) = own_delay.or(delay) {
            tokio::time::sleep(delay).await;
        }

        result.map_err(TransportError)
    }
}
