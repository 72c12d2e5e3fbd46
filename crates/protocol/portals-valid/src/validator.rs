//! Validator trait and default implementation.
//!
//! Groups the three challenge checks behind one object so a negotiator can
//! be configured once and swap the implementation in tests.

use portals_crypto::Address;
use portals_types::constants::PRICE_TOLERANCE;

use crate::consistency::check_price_consistency;
use crate::error::ValidationResult;
use crate::price::{validate_amount, PriceBounds};
use crate::vault::verify_payment_destination;

/// Checks applied to a payment challenge before anything is paid.
pub trait Validator: Send + Sync {
    /// Absolute bounds on the requested amount.
    fn validate_amount(&self, amount: f64) -> ValidationResult<()>;

    /// Requested amount against the API's declared prices.
    fn validate_price_consistency(&self, declared: &[f64], requested: f64) -> ValidationResult<()>;

    /// Destination against the registry vault; returns the account to pay.
    fn verify_destination(&self, vault: &Address, destination: &str) -> ValidationResult<Address>;
}

/// Configuration for the default validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Amount bounds
    pub bounds: PriceBounds,
    /// Allowed distance from a declared price
    pub tolerance: f64,
    /// Stablecoin mint whose token accounts receive payments
    pub mint: Address,
}

impl ValidatorConfig {
    /// Default bounds and tolerance for the given mint.
    pub fn new(mint: Address) -> Self {
        Self {
            bounds: PriceBounds::default(),
            tolerance: PRICE_TOLERANCE,
            mint,
        }
    }

    /// Replace the amount bounds.
    pub fn with_bounds(mut self, bounds: PriceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the price tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Default validator backed by the standalone check functions.
#[derive(Debug, Clone)]
pub struct DefaultValidator {
    config: ValidatorConfig,
}

impl DefaultValidator {
    /// Create a validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }
}

impl Validator for DefaultValidator {
    fn validate_amount(&self, amount: f64) -> ValidationResult<()> {
        validate_amount(amount, &self.config.bounds)
    }

    fn validate_price_consistency(&self, declared: &[f64], requested: f64) -> ValidationResult<()> {
        check_price_consistency(declared, requested, self.config.tolerance)
    }

    fn verify_destination(&self, vault: &Address, destination: &str) -> ValidationResult<Address> {
        verify_payment_destination(vault, destination, &self.config.mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use portals_crypto::USDC_MINT_MAINNET;

    fn validator() -> DefaultValidator {
        DefaultValidator::new(ValidatorConfig::new(USDC_MINT_MAINNET.parse().unwrap()))
    }

    #[test]
    fn test_default_config() {
        let v = validator();
        assert_eq!(v.config().bounds, PriceBounds::default());
        assert_eq!(v.config().tolerance, 0.0001);
    }

    #[test]
    fn test_delegates_to_checks() {
        let v = validator();
        assert!(v.validate_amount(1.0).is_ok());
        assert!(matches!(
            v.validate_amount(20.0),
            Err(ValidationError::AmountTooHigh { .. })
        ));
        assert!(v.validate_price_consistency(&[1.0], 1.0).is_ok());
        assert!(v
            .verify_destination(&Address([0x11; 32]), "E7NuY4h3WV7H1xBZ5j3mAA2HmuWkJcxuN9kwuPnTxzXA")
            .is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let v = DefaultValidator::new(
            ValidatorConfig::new(Address::default())
                .with_bounds(PriceBounds::new(0.5, 50.0).unwrap())
                .with_tolerance(0.01),
        );
        assert!(v.validate_amount(20.0).is_ok());
        assert!(v.validate_amount(0.1).is_err());
        assert!(v.validate_price_consistency(&[1.0], 1.01).is_ok());
    }
}
