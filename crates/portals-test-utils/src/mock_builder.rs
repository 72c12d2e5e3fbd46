//! Mock implementation of the `PaymentBuilder` trait for testing.

use async_trait::async_trait;
use portals_x402::{PaymentBuilder, SignedTransaction, TransferRequest, X402Error, X402Result};
use std::sync::{Arc, RwLock};

struct MockPaymentBuilderInner {
    /// Every request received.
    requests: Vec<TransferRequest>,
    /// When true, every build fails with `PaymentBuild`.
    should_fail: bool,
    /// Wallet balance in USDC; builds above it fail with `InsufficientFunds`.
    balance: Option<f64>,
    /// Auto-incrementing transaction counter.
    tx_counter: u64,
}

/// A mock payment builder returning `mock-signed-tx-<n>` blobs.
///
/// Clones share state.
#[derive(Clone)]
pub struct MockPaymentBuilder {
    inner: Arc<RwLock<MockPaymentBuilderInner>>,
}

impl Default for MockPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentBuilder {
    /// Builder with unlimited funds.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockPaymentBuilderInner {
                requests: Vec::new(),
                should_fail: false,
                balance: None,
                tx_counter: 0,
            })),
        }
    }

    /// Fail every build.
    pub fn with_failure(self) -> Self {
        self.inner.write().unwrap().should_fail = true;
        self
    }

    /// Limit the wallet balance.
    pub fn with_balance(self, usdc: f64) -> Self {
        self.inner.write().unwrap().balance = Some(usdc);
        self
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// Number of build requests received.
    pub fn build_count(&self) -> usize {
        self.inner.read().unwrap().requests.len()
    }

    /// All build requests received.
    pub fn requests(&self) -> Vec<TransferRequest> {
        self.inner.read().unwrap().requests.clone()
    }
}

#[async_trait]
impl PaymentBuilder for MockPaymentBuilder {
    async fn build(&self, request: &TransferRequest) -> X402Result<SignedTransaction> {
        let mut inner = self.inner.write().unwrap();
        inner.requests.push(request.clone());

        if inner.should_fail {
            return Err(X402Error::PaymentBuild {
                reason: "mock failure".to_string(),
            });
        }

        if let Some(balance) = inner.balance {
            if request.amount > balance {
                return Err(X402Error::InsufficientFunds {
                    required: request.amount,
                    available: balance,
                });
            }
        }

        inner.tx_counter += 1;
        Ok(SignedTransaction(format!("mock-signed-tx-{}", inner.tx_counter)))
    }
}
