//! Helper functions for creating test fixtures.
//!
//! Addresses below are real derivations: `VAULT_TOKEN_ACCOUNT` is the
//! mainnet USDC associated token account of `vault_owner()`.

use std::sync::Arc;

use portals_crypto::{Address, USDC_MINT_MAINNET};
use portals_registry::RegistryRecord;
use portals_valid::{DefaultValidator, Validator, ValidatorConfig};
use portals_x402::{ApiResponse, Negotiator, PortalsClient, X402Config};
use serde_json::{json, Value};

use crate::{MockPaymentBuilder, MockRecordSource, MockTransport};

/// Base58 of `[0x11; 32]`.
pub const VAULT_OWNER: &str = "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2";

/// Mainnet USDC token account of [`VAULT_OWNER`].
pub const VAULT_TOKEN_ACCOUNT: &str = "E7NuY4h3WV7H1xBZ5j3mAA2HmuWkJcxuN9kwuPnTxzXA";

/// Mainnet USDC token account of `[0x22; 32]`, unrelated to the vault.
pub const FOREIGN_TOKEN_ACCOUNT: &str = "88e2uEPnmitZszz4rx3oZkLKr7DBy4hiAAZ8Gbmohm2X";

/// Base URL of the fixture API.
pub const API_URL: &str = "https://weather.example.com/api";

/// The vault owner as an address.
pub fn vault_owner() -> Address {
    Address([0x11; 32])
}

/// Address of the fixture registry entry.
pub fn api_address() -> Address {
    Address([0x42; 32])
}

/// Registry record whose payment vault is [`VAULT_OWNER`].
pub fn sample_record() -> RegistryRecord {
    RegistryRecord {
        address: api_address(),
        provider: Address([0x07; 32]),
        title: "Weather".to_string(),
        description: "Forecasts by city".to_string(),
        url: API_URL.to_string(),
        payment_vault: vault_owner(),
        collateral_vault: Address([0x08; 32]),
        collateral_amount: 100_000_000,
        total_claimed: 0,
        suspended: false,
        created_at: 1_700_000_000,
        last_updated: 1_700_000_000,
    }
}

/// OpenAPI document with one fixed-price and one tiered tool.
///
/// Declared prices: 0.05, 0.01, 2.50.
pub fn weather_schema() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Weather API", "version": "1.0.0" },
        "paths": {
            "/forecast": {
                "post": {
                    "operationId": "getForecast",
                    "summary": "Forecast for a city",
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": { "city": { "type": "string" } }
                                }
                            }
                        }
                    },
                    "x-portals-pricing": { "type": "fixed", "price": 0.05 }
                }
            },
            "/history": {
                "post": {
                    "operationId": "getHistory",
                    "x-portals-pricing": {
                        "type": "tiered",
                        "parameter": "range",
                        "options": [
                            { "value": "day", "price": 0.01 },
                            { "value": "decade", "price": 2.50 }
                        ]
                    }
                }
            }
        }
    })
}

/// 200 with a JSON body.
pub fn ok_response(body: Value) -> ApiResponse {
    ApiResponse::new(200, body.to_string())
}

/// 402 carrying an `x402-*` header challenge.
pub fn header_challenge(amount: &str, address: &str) -> ApiResponse {
    ApiResponse::new(402, "")
        .with_header("x402-amount", amount)
        .with_header("x402-address", address)
}

/// 402 carrying an x402 JSON body challenge; `micro_units` is the raw amount.
pub fn body_challenge(micro_units: &str, pay_to: &str, fee_payer: Option<&str>) -> ApiResponse {
    let mut option = json!({
        "scheme": "exact",
        "network": "solana",
        "maxAmountRequired": micro_units,
        "payTo": pay_to,
    });
    if let Some(fee_payer) = fee_payer {
        option["extra"] = json!({ "feePayer": fee_payer });
    }
    ApiResponse::new(402, json!({ "x402Version": 1, "accepts": [option] }).to_string())
}

/// Default-bounds validator for mainnet USDC.
pub fn mainnet_validator() -> Arc<dyn Validator> {
    let mint: Address = USDC_MINT_MAINNET.parse().unwrap();
    Arc::new(DefaultValidator::new(ValidatorConfig::new(mint)))
}

/// Negotiator over the given mocks with default limits.
pub fn test_negotiator(transport: &MockTransport, builder: &MockPaymentBuilder) -> Negotiator {
    Negotiator::new(
        Arc::new(transport.clone()),
        Arc::new(builder.clone()),
        mainnet_validator(),
    )
}

/// Mainnet client with default limits over the given mocks.
pub fn mock_client(
    source: &MockRecordSource,
    transport: &MockTransport,
    builder: &MockPaymentBuilder,
) -> PortalsClient {
    PortalsClient::with_collaborators(
        &X402Config::default(),
        Arc::new(source.clone()),
        Arc::new(transport.clone()),
        Arc::new(builder.clone()),
    )
    .unwrap()
}
