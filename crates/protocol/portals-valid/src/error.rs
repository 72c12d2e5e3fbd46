//! Validation error types.
//!
//! Every check in this crate fails with a [`ValidationError`]. All of them
//! are raised before any payment is built, so none of them moves funds.

use thiserror::Error;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors that can occur while vetting a payment challenge.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    // =========================================================================
    // Amount bounds
    // =========================================================================
    /// Amount is zero, negative or not a number
    #[error("invalid payment amount: {amount}")]
    InvalidAmount {
        /// Requested amount
        amount: f64,
    },

    /// Amount below the configured minimum
    #[error("payment amount {amount} is below the minimum of {min}")]
    AmountTooLow {
        /// Requested amount
        amount: f64,
        /// Configured minimum
        min: f64,
    },

    /// Amount above the configured maximum
    #[error("payment amount {amount} exceeds the maximum of {max}")]
    AmountTooHigh {
        /// Requested amount
        amount: f64,
        /// Configured maximum
        max: f64,
    },

    /// Bounds are unusable (min above max, or non-positive)
    #[error("invalid price bounds: min {min}, max {max}")]
    InvalidBounds {
        /// Configured minimum
        min: f64,
        /// Configured maximum
        max: f64,
    },

    /// Price tolerance is negative or not finite
    #[error("invalid price tolerance: {tolerance}")]
    InvalidTolerance {
        /// Configured tolerance
        tolerance: f64,
    },

    // =========================================================================
    // Declared pricing
    // =========================================================================
    /// Requested amount matches none of the prices the API declares
    #[error("pricing mismatch: requested {requested}, declared {declared:?}")]
    PricingMismatch {
        /// Every declared price, flattened
        declared: Vec<f64>,
        /// Requested amount
        requested: f64,
    },

    // =========================================================================
    // Destination
    // =========================================================================
    /// Challenge destination is not bound to the registry vault
    #[error("payment address mismatch: expected {expected}, received {received}")]
    PaymentAddressMismatch {
        /// Token account derived from the registry vault
        expected: String,
        /// Destination named by the challenge
        received: String,
    },

    /// The vault's token account could not be derived
    #[error("failed to derive token account for vault {vault}: {reason}")]
    Derivation {
        /// Vault address
        vault: String,
        /// Underlying failure
        reason: String,
    },
}

impl ValidationError {
    /// Short hint for the person running the call.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "The API requested a nonsensical amount. Do not retry.",
            Self::AmountTooLow { .. } | Self::AmountTooHigh { .. } => {
                "Adjust the payment bounds in your config if this price is expected."
            }
            Self::InvalidBounds { .. } => "Set min_amount <= max_amount, both above zero.",
            Self::InvalidTolerance { .. } => "Set the price tolerance to a small non-negative number.",
            Self::PricingMismatch { .. } => {
                "The server asked for a price its schema does not declare. Contact the provider."
            }
            Self::PaymentAddressMismatch { .. } => {
                "The server asked to be paid somewhere other than its registered vault. Do not pay."
            }
            Self::Derivation { .. } => "The registry entry has an unusable vault address.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::AmountTooHigh {
            amount: 12.5,
            max: 10.0,
        };
        assert!(err.to_string().contains("12.5"));
        assert!(err.to_string().contains("10"));

        let err = ValidationError::PaymentAddressMismatch {
            expected: "Exp".into(),
            received: "Rec".into(),
        };
        assert!(err.to_string().contains("Exp"));
        assert!(err.to_string().contains("Rec"));
    }

    #[test]
    fn test_error_clone() {
        let err = ValidationError::PricingMismatch {
            declared: vec![1.0, 2.0],
            requested: 3.0,
        };
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_suggestions_present() {
        let err = ValidationError::InvalidAmount { amount: -1.0 };
        assert!(!err.suggestion().is_empty());
    }
}
