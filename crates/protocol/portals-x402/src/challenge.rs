//! Parsing 402 Payment Required responses.
//!
//! Servers express the challenge in one of two ways:
//!
//! - **Headers**: `x402-amount` (decimal USDC) and `x402-address`, with
//!   optional `x402-currency` and `x402-chain`
//! - **Body**: an x402 JSON document whose `accepts[0]` carries
//!   `maxAmountRequired` or `amount` (micro-units), `payTo`, `network` and
//!   `extra.feePayer`
//!
//! Headers win when both are present.

use portals_types::constants::{
    DEFAULT_CHAIN, DEFAULT_CURRENCY, HEADER_X402_ADDRESS, HEADER_X402_AMOUNT, HEADER_X402_CHAIN,
    HEADER_X402_CURRENCY, MICRO_UNITS_PER_USDC,
};
use serde_json::Value;

use crate::error::{X402Error, X402Result};
use crate::transport::ApiResponse;
use crate::types::PaymentRequirement;

/// A detected payment challenge, in the encoding the server used.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentChallenge {
    /// `x402-*` response headers.
    Headers {
        /// Raw `x402-amount` text
        amount: String,
        /// `x402-currency`, if sent
        currency: Option<String>,
        /// `x402-chain`, if sent
        chain: Option<String>,
        /// `x402-address`
        address: String,
    },
    /// `accepts[0]` of a JSON body.
    Body {
        /// First accepted payment option
        option: Value,
    },
}

impl PaymentChallenge {
    /// Find the challenge in a 402 response, headers first.
    pub fn detect(response: &ApiResponse) -> X402Result<Self> {
        let amount = non_empty(response.header(HEADER_X402_AMOUNT));
        let address = non_empty(response.header(HEADER_X402_ADDRESS));

        if let (Some(amount), Some(address)) = (amount, address) {
            return Ok(Self::Headers {
                amount: amount.to_string(),
                currency: non_empty(response.header(HEADER_X402_CURRENCY)).map(str::to_string),
                chain: non_empty(response.header(HEADER_X402_CHAIN)).map(str::to_string),
                address: address.to_string(),
            });
        }

        if let Some(option) = response
            .json()
            .and_then(|body| body.get("accepts")?.as_array()?.first().cloned())
        {
            return Ok(Self::Body { option });
        }

        Err(X402Error::MalformedChallenge {
            reason: "missing payment details".to_string(),
        })
    }

    /// Normalize into a payment requirement.
    ///
    /// An amount that does not parse becomes NaN and is left for the price
    /// validator to reject.
    pub fn into_requirement(self) -> X402Result<PaymentRequirement> {
        match self {
            Self::Headers {
                amount,
                currency,
                chain,
                address,
            } => Ok(PaymentRequirement {
                amount: amount.trim().parse().unwrap_or(f64::NAN),
                currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                chain: chain.unwrap_or_else(|| DEFAULT_CHAIN.to_string()),
                destination: address,
                fee_payer: None,
            }),
            Self::Body { option } => {
                let destination = option
                    .get("payTo")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| X402Error::MalformedChallenge {
                        reason: "missing payTo in accepts[0]".to_string(),
                    })?
                    .to_string();

                let micro_units = ["maxAmountRequired", "amount"]
                    .iter()
                    .find_map(|key| amount_field(option.get(*key)))
                    .unwrap_or(0.0);

                let chain = option
                    .get("network")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_CHAIN)
                    .to_string();

                let fee_payer = option
                    .get("extra")
                    .and_then(|extra| extra.get("feePayer"))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);

                Ok(PaymentRequirement {
                    amount: micro_units / MICRO_UNITS_PER_USDC as f64,
                    currency: DEFAULT_CURRENCY.to_string(),
                    chain,
                    destination,
                    fee_payer,
                })
            }
        }
    }
}

/// Detect and normalize in one step.
pub fn parse_challenge(response: &ApiResponse) -> X402Result<PaymentRequirement> {
    PaymentChallenge::detect(response)?.into_requirement()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A micro-unit amount given as a number or a numeric string. Absent, null,
/// empty and numeric zero values fall through to the next candidate field.
fn amount_field(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| *v != 0.0),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().parse().unwrap_or(f64::NAN)),
        _ => None,
    }
}
