//! x402 wire types and client configuration.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use portals_crypto::Address;
use portals_types::constants::{
    API_CALL_TIMEOUT_SECS, DEFAULT_MAX_PAYMENT, DEFAULT_MIN_PAYMENT, PRICE_TOLERANCE,
    SCHEMA_FETCH_TIMEOUT_SECS, SCHEME_EXACT, X402_VERSION,
};
use portals_types::Network;
use serde::{Deserialize, Serialize};

use crate::error::{X402Error, X402Result};

/// What a 402 challenge asks for, in either encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequirement {
    /// Amount in major units (USDC)
    pub amount: f64,
    /// Currency code
    pub currency: String,
    /// Chain identifier
    pub chain: String,
    /// Destination named by the server, unverified
    pub destination: String,
    /// Account that pays network fees, if the server sponsors them
    pub fee_payer: Option<String>,
}

/// Inner payload of a payment proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPayload {
    /// Signed transaction blob, opaque to this crate
    pub transaction: String,
}

/// Payment proof sent in the `X-PAYMENT` header of the retry.
///
/// Wire form: base64 of `{"x402Version":1,"scheme":"exact","network":...,"payload":{"transaction":...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    /// Protocol version
    pub x402_version: u32,
    /// Payment scheme
    pub scheme: String,
    /// Chain the payment was made on
    pub network: String,
    /// Signed payment
    pub payload: ProofPayload,
}

impl PaymentProof {
    /// Proof for an exact-amount payment on `network`.
    pub fn exact(network: &str, transaction: String) -> Self {
        Self {
            x402_version: X402_VERSION,
            scheme: SCHEME_EXACT.to_string(),
            network: network.to_string(),
            payload: ProofPayload { transaction },
        }
    }

    /// Encode this proof to a base64 string for the header.
    pub fn to_header(&self) -> X402Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| X402Error::ProofEncoding(format!("JSON encode error: {}", e)))?;
        Ok(BASE64.encode(json))
    }

    /// Decode a proof from a base64-encoded header value.
    pub fn from_header(header_value: &str) -> X402Result<Self> {
        let decoded = BASE64
            .decode(header_value)
            .map_err(|e| X402Error::ProofEncoding(format!("base64 decode error: {}", e)))?;
        serde_json::from_slice(&decoded)
            .map_err(|e| X402Error::ProofEncoding(format!("JSON parse error: {}", e)))
    }
}

/// What a paid call reports back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// Amount paid in major units
    pub amount: f64,
    /// Currency code
    pub currency: String,
    /// Chain paid on
    pub chain: String,
    /// Token account actually credited
    pub destination: Address,
    /// Sponsor of network fees, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<Address>,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct X402Config {
    /// Cluster the registry and payments live on
    pub network: Network,
    /// RPC endpoint override
    pub rpc_url: Option<String>,
    /// Smallest payment accepted
    pub min_amount: f64,
    /// Largest payment accepted
    pub max_amount: f64,
    /// Allowed distance between requested and declared prices
    pub price_tolerance: f64,
    /// Schema fetch limit in seconds
    pub schema_timeout_secs: u64,
    /// Per-call limit in seconds
    pub call_timeout_secs: u64,
}

impl Default for X402Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            min_amount: DEFAULT_MIN_PAYMENT,
            max_amount: DEFAULT_MAX_PAYMENT,
            price_tolerance: PRICE_TOLERANCE,
            schema_timeout_secs: SCHEMA_FETCH_TIMEOUT_SECS,
            call_timeout_secs: API_CALL_TIMEOUT_SECS,
        }
    }
}

impl X402Config {
    /// Defaults for devnet.
    pub fn devnet() -> Self {
        Self {
            network: Network::Devnet,
            ..Self::default()
        }
    }

    /// RPC endpoint in effect: the override, else the cluster default.
    pub fn rpc_endpoint(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.config().rpc_endpoint.to_string())
    }
}
