//! x402 Payment Required negotiation for the Portals client.
//!
//! A registry-listed API answers an unpaid call with `402 Payment Required`
//! and a payment challenge. This crate:
//!
//! 1. Reads the API's OpenAPI document for its tools and declared prices
//! 2. Makes the call, and on 402 parses the challenge (headers or JSON body)
//! 3. Checks the amount against configured bounds and declared prices
//! 4. Checks the destination against the vault in the registry record
//! 5. Has an injected [`PaymentBuilder`] sign the transfer
//! 6. Retries the call once with an `X-PAYMENT` proof
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use portals_types::Network;
//! use portals_x402::{PortalsClient, RemotePaymentBuilder, X402Config};
//!
//! # async fn run() -> Result<(), portals_x402::X402Error> {
//! let config = X402Config::devnet();
//! let builder = RemotePaymentBuilder::new("http://localhost:9000/sign", Network::Devnet.config())?;
//! let client = PortalsClient::from_config(&config, Arc::new(builder))?;
//!
//! let outcome = client
//!     .call_api(
//!         "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2",
//!         &serde_json::json!({ "city": "Lisbon" }),
//!         Some("getForecast"),
//!     )
//!     .await?;
//! println!("{}", outcome.body);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod challenge;
pub mod client;
pub mod error;
pub mod negotiator;
pub mod schema;
pub mod transport;
pub mod types;

pub use builder::{PaymentBuilder, RemotePaymentBuilder, SignedTransaction, TransferRequest};
pub use challenge::{parse_challenge, PaymentChallenge};
pub use client::PortalsClient;
pub use error::{CallStage, TimedOperation, X402Error, X402Result};
pub use negotiator::{CallOutcome, Negotiation, NegotiationState, Negotiator, NegotiatorConfig};
pub use schema::{
    declared_prices, extract_tools, format_pricing, price_for_params, resolve_target_url,
    schema_url, OpenApiSchema, Pricing, PricingOption, ToolDescriptor,
};
pub use transport::{ApiResponse, ApiTransport, HttpTransport, TransportError};
pub use types::{PaymentProof, PaymentReceipt, PaymentRequirement, ProofPayload, X402Config};
