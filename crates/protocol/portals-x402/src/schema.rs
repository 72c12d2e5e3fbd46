//! Tool discovery from an API's OpenAPI document.
//!
//! Every operation with an `operationId` is a tool. Pricing comes from the
//! `x-portals-pricing` extension:
//!
//! ```json
//! { "type": "fixed", "price": 0.05 }
//! { "type": "tiered", "parameter": "size", "options": [{ "value": "small", "price": 0.01 }] }
//! ```

use std::collections::BTreeMap;

use portals_types::constants::{PRICING_EXTENSION, SCHEMA_DOCUMENT};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{X402Error, X402Result};

/// One tier of a tiered price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOption {
    /// Parameter value this tier applies to
    pub value: Value,
    /// Price in USDC
    pub price: f64,
}

/// Declared price of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Pricing {
    /// One price for every call.
    Fixed {
        /// Price in USDC
        price: f64,
    },
    /// Price chosen by the value of one request parameter.
    Tiered {
        /// Request parameter that selects the tier
        parameter: String,
        /// Available tiers
        options: Vec<PricingOption>,
    },
}

impl Pricing {
    /// Every price this declaration can charge.
    pub fn prices(&self) -> Vec<f64> {
        match self {
            Self::Fixed { price } => vec![*price],
            Self::Tiered { options, .. } => options.iter().map(|o| o.price).collect(),
        }
    }
}

/// A callable operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// `operationId`
    pub operation_id: String,
    /// Path relative to the API base URL
    pub path: String,
    /// Upper-case HTTP method
    pub method: String,
    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON request body schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<Value>,
    /// Declared pricing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
}

/// The parts of an OpenAPI document the client reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApiSchema {
    /// OpenAPI version string
    #[serde(default)]
    pub openapi: Option<String>,
    /// `info` block
    #[serde(default)]
    pub info: Option<Value>,
    /// `paths.<path>.<method>` operations; `x-` extensions may sit alongside
    #[serde(default)]
    pub paths: BTreeMap<String, Value>,
}

impl OpenApiSchema {
    /// Parse from a fetched JSON document.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// All tools, ordered by path then method.
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        extract_tools(self)
    }
}

/// Extract tool descriptors from a schema.
pub fn extract_tools(schema: &OpenApiSchema) -> Vec<ToolDescriptor> {
    let mut tools = Vec::new();

    for (path, item) in &schema.paths {
        let Some(methods) = item.as_object() else {
            continue;
        };
        for (method, operation) in methods {
            if method == "parameters" {
                continue;
            }
            let Some(operation_id) = operation.get("operationId").and_then(Value::as_str) else {
                continue;
            };

            let text = |key: &str| operation.get(key).and_then(Value::as_str).map(str::to_string);

            tools.push(ToolDescriptor {
                operation_id: operation_id.to_string(),
                path: path.clone(),
                method: method.to_uppercase(),
                summary: text("summary"),
                description: text("description"),
                request_schema: operation
                    .pointer("/requestBody/content/application~1json/schema")
                    .cloned(),
                pricing: parse_pricing(operation_id, operation.get(PRICING_EXTENSION)),
            });
        }
    }

    tools
}

fn parse_pricing(operation_id: &str, raw: Option<&Value>) -> Option<Pricing> {
    let raw = raw?;
    match serde_json::from_value::<Pricing>(raw.clone()) {
        Ok(pricing) => Some(pricing),
        Err(e) => {
            warn!(operation_id, error = %e, "Ignoring unrecognized pricing extension");
            None
        }
    }
}

/// Fixed prices plus every tiered option price, across all tools, without
/// duplicates.
pub fn declared_prices(tools: &[ToolDescriptor]) -> Vec<f64> {
    let mut prices: Vec<f64> = Vec::new();
    for price in tools.iter().filter_map(|t| t.pricing.as_ref()).flat_map(Pricing::prices) {
        if !prices.contains(&price) {
            prices.push(price);
        }
    }
    prices
}

fn dollars(amount: f64) -> String {
    let decimals = if amount < 0.01 { 3 } else { 2 };
    format!("${:.*}", decimals, amount)
}

/// Human-readable price of a tool.
pub fn format_pricing(pricing: Option<&Pricing>) -> String {
    match pricing {
        None => "Price not specified".to_string(),
        Some(Pricing::Fixed { price }) => format!("{} USDC", dollars(*price)),
        Some(Pricing::Tiered { options, .. }) if options.is_empty() => "Dynamic pricing".to_string(),
        Some(Pricing::Tiered { options, .. }) => {
            let min = options.iter().map(|o| o.price).fold(f64::INFINITY, f64::min);
            let max = options.iter().map(|o| o.price).fold(f64::NEG_INFINITY, f64::max);
            if min == max {
                format!("{} USDC", dollars(min))
            } else {
                format!("{} - {} USDC", dollars(min), dollars(max))
            }
        }
    }
}

/// Price a call with these params would be charged, if it can be known.
pub fn price_for_params(pricing: Option<&Pricing>, params: &Value) -> Option<f64> {
    match pricing? {
        Pricing::Fixed { price } => Some(*price),
        Pricing::Tiered { parameter, options } => {
            let value = params.get(parameter)?;
            options.iter().find(|o| &o.value == value).map(|o| o.price)
        }
    }
}

/// URL of the OpenAPI document for an API base URL.
///
/// The document sits directly under the base path; query and fragment are
/// dropped.
pub fn schema_url(base_url: &str) -> X402Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| X402Error::SchemaUnavailable {
        url: base_url.to_string(),
        reason: format!("invalid URL: {}", e),
    })?;

    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(SCHEMA_DOCUMENT);

    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// URL to call for `tool_name`: the tool's path under the base URL, or the
/// base URL itself when no tool is named or the name is unknown.
pub fn resolve_target_url(base_url: &str, tools: &[ToolDescriptor], tool_name: Option<&str>) -> String {
    let Some(name) = tool_name else {
        return base_url.to_string();
    };

    match tools.iter().find(|t| t.operation_id == name) {
        Some(tool) if !tool.path.is_empty() => {
            format!("{}{}", base_url.trim_end_matches('/'), tool.path)
        }
        _ => {
            warn!(tool = name, base_url, "Unknown tool, calling base URL");
            base_url.to_string()
        }
    }
}
