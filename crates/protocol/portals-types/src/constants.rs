//! Protocol constants.
//!
//! Payment bounds, matching tolerance, network timeouts and the names used on
//! the x402 wire.

// =============================================================================
// Token
// =============================================================================

/// Decimals of the USDC mint.
pub const USDC_DECIMALS: u8 = 6;

/// Micro-units per whole USDC.
pub const MICRO_UNITS_PER_USDC: u64 = 1_000_000;

/// Currency code assumed when a challenge does not name one.
pub const DEFAULT_CURRENCY: &str = "USDC";

// =============================================================================
// Payment Bounds
// =============================================================================

/// Smallest payment accepted without reconfiguration (USDC).
pub const DEFAULT_MIN_PAYMENT: f64 = 0.001;

/// Largest payment accepted without reconfiguration (USDC).
pub const DEFAULT_MAX_PAYMENT: f64 = 10.0;

/// Maximum difference between a requested and a declared price (USDC).
pub const PRICE_TOLERANCE: f64 = 0.0001;

// =============================================================================
// Timeouts
// =============================================================================

/// Schema fetch limit in seconds.
pub const SCHEMA_FETCH_TIMEOUT_SECS: u64 = 10;

/// Limit for a single API call (initial or paid retry) in seconds.
pub const API_CALL_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// x402 Wire
// =============================================================================

/// x402 protocol version carried in payment proofs.
pub const X402_VERSION: u32 = 1;

/// Settlement scheme: a signed transfer of exactly the requested amount.
pub const SCHEME_EXACT: &str = "exact";

/// Chain identifier assumed when a challenge does not name one.
pub const DEFAULT_CHAIN: &str = "solana";

/// Request header carrying the encoded payment proof.
pub const HEADER_PAYMENT: &str = "X-PAYMENT";

/// Challenge header: amount in major units.
pub const HEADER_X402_AMOUNT: &str = "x402-amount";

/// Challenge header: currency code.
pub const HEADER_X402_CURRENCY: &str = "x402-currency";

/// Challenge header: chain identifier.
pub const HEADER_X402_CHAIN: &str = "x402-chain";

/// Challenge header: payment destination.
pub const HEADER_X402_ADDRESS: &str = "x402-address";

/// OpenAPI vendor extension carrying tool pricing.
pub const PRICING_EXTENSION: &str = "x-portals-pricing";

/// Schema document name, resolved relative to the API base URL.
pub const SCHEMA_DOCUMENT: &str = "openapi.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_bounds_are_ordered() {
        assert!(DEFAULT_MIN_PAYMENT > 0.0);
        assert!(DEFAULT_MIN_PAYMENT < DEFAULT_MAX_PAYMENT);
        assert!(PRICE_TOLERANCE < DEFAULT_MIN_PAYMENT);
    }

    #[test]
    fn test_micro_units_match_decimals() {
        assert_eq!(MICRO_UNITS_PER_USDC, 10u64.pow(USDC_DECIMALS as u32));
    }
}
