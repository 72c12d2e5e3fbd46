//! Payment builder capability.
//!
//! Building and signing a stablecoin transfer is delegated: the negotiator
//! only needs an opaque signed blob it can put in the payment proof.

use std::time::Duration;

use async_trait::async_trait;
use portals_crypto::Address;
use portals_types::{from_minor_units, to_minor_units, Amount, NetworkConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{X402Error, X402Result};

/// Default HTTP timeout for signing requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A verified transfer the builder is asked to sign.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Token account to credit
    pub destination: Address,
    /// Amount in major units
    pub amount: f64,
    /// Sponsor of network fees, if any
    pub fee_payer: Option<Address>,
    /// Chain named by the challenge
    pub chain: String,
}

impl TransferRequest {
    /// Amount in minor units.
    pub fn amount_minor(&self) -> Amount {
        to_minor_units(self.amount)
    }
}

/// Signed transaction blob, opaque to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTransaction(pub String);

impl SignedTransaction {
    /// The blob as sent in the proof.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignedTransaction({} bytes)", self.0.len())
    }
}

/// Produces a signed transfer for a verified payment.
#[async_trait]
pub trait PaymentBuilder: Send + Sync {
    /// Build and sign the transfer.
    ///
    /// Fails with `InsufficientFunds` when the wallet cannot cover the
    /// amount, `PaymentBuild` otherwise.
    async fn build(&self, request: &TransferRequest) -> X402Result<SignedTransaction>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    mint: &'a str,
    destination: String,
    amount: Amount,
    decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_payer: Option<String>,
    network: &'a str,
}

#[derive(Deserialize)]
struct SignResponse {
    transaction: Option<String>,
    error: Option<String>,
    required: Option<Amount>,
    available: Option<Amount>,
}

/// [`PaymentBuilder`] that asks an external signing service.
///
/// The service receives `POST {endpoint}` with
/// `{mint, destination, amount, decimals, feePayer?, network}` (amount in
/// minor units) and answers `{transaction}`, or
/// `{error: "insufficient_funds", required, available}`.
#[derive(Clone)]
pub struct RemotePaymentBuilder {
    client: Client,
    endpoint: String,
    network: NetworkConfig,
}

impl RemotePaymentBuilder {
    /// Create a builder for the given signing endpoint and cluster.
    pub fn new(endpoint: &str, network: NetworkConfig) -> X402Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| X402Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            network,
        })
    }

    fn sign_request(&self, request: &TransferRequest) -> SignRequest<'_> {
        SignRequest {
            mint: self.network.usdc_mint,
            destination: request.destination.to_string(),
            amount: request.amount_minor(),
            decimals: self.network.usdc_decimals,
            fee_payer: request.fee_payer.map(|a| a.to_string()),
            network: self.network.network.as_str(),
        }
    }
}

#[async_trait]
impl PaymentBuilder for RemotePaymentBuilder {
    async fn build(&self, request: &TransferRequest) -> X402Result<SignedTransaction> {
        debug!(
            endpoint = %self.endpoint,
            destination = %request.destination,
            amount = request.amount,
            "Requesting signed transfer"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.sign_request(request))
            .send()
            .await
            .map_err(|e| X402Error::PaymentBuild {
                reason: format!("signing service unreachable: {}", e),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| X402Error::PaymentBuild {
            reason: format!("failed to read signing response: {}", e),
        })?;

        let body: SignResponse = serde_json::from_str(&text).map_err(|_| X402Error::PaymentBuild {
            reason: format!("signing service returned {}: {}", status, text),
        })?;

        interpret_sign_response(body, status.as_u16())
    }
}

fn interpret_sign_response(body: SignResponse, status: u16) -> X402Result<SignedTransaction> {
    if body.error.as_deref() == Some("insufficient_funds") {
        let required = from_minor_units(body.required.unwrap_or(0));
        let available = from_minor_units(body.available.unwrap_or(0));
        warn!(required, available, "Wallet cannot cover payment");
        return Err(X402Error::InsufficientFunds { required, available });
    }

    if let Some(error) = body.error {
        return Err(X402Error::PaymentBuild {
            reason: format!("signing service error ({}): {}", status, error),
        });
    }

    match body.transaction {
        Some(tx) if !tx.is_empty() && (200..300).contains(&status) => {
            info!(bytes = tx.len(), "Signed transfer received");
            Ok(SignedTransaction(tx))
        }
        _ => Err(X402Error::PaymentBuild {
            reason: format!("signing service returned {} without a transaction", status),
        }),
    }
}
