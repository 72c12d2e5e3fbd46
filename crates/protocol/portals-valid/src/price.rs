//! Absolute bounds on a requested amount.

use portals_types::constants::{DEFAULT_MAX_PAYMENT, DEFAULT_MIN_PAYMENT};

use crate::error::{ValidationError, ValidationResult};

/// Inclusive bounds on a single payment, in major units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    /// Smallest accepted amount
    pub min: f64,
    /// Largest accepted amount
    pub max: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PAYMENT,
            max: DEFAULT_MAX_PAYMENT,
        }
    }
}

impl PriceBounds {
    /// Create bounds, rejecting `min > max` and non-positive limits.
    pub fn new(min: f64, max: f64) -> ValidationResult<Self> {
        if min.is_nan() || max.is_nan() || min <= 0.0 || min > max {
            return Err(ValidationError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Check an amount against these bounds.
    pub fn validate(&self, amount: f64) -> ValidationResult<()> {
        validate_amount(amount, self)
    }
}

/// Validate a requested amount.
///
/// 1. NaN, zero and negatives are `InvalidAmount`
/// 2. Below `min` is `AmountTooLow`
/// 3. Above `max` is `AmountTooHigh`
pub fn validate_amount(amount: f64, bounds: &PriceBounds) -> ValidationResult<()> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount { amount });
    }

    if amount < bounds.min {
        return Err(ValidationError::AmountTooLow {
            amount,
            min: bounds.min,
        });
    }

    if amount > bounds.max {
        return Err(ValidationError::AmountTooHigh {
            amount,
            max: bounds.max,
        });
    }

    Ok(())
}
