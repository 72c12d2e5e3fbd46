//! Requested price against the prices an API declares.

use portals_types::to_minor_units;

use crate::error::{ValidationError, ValidationResult};

/// Reject a tolerance that is negative, NaN or infinite.
pub fn validate_tolerance(tolerance: f64) -> ValidationResult<f64> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ValidationError::InvalidTolerance { tolerance });
    }
    Ok(tolerance)
}

/// Check that `requested` is within `tolerance` of at least one declared price.
///
/// Prices are compared in integer micro-units, so a difference of exactly
/// `tolerance` is accepted. An empty declaration accepts anything. The match
/// may be against any declared price, not only the invoked tool's.
pub fn check_price_consistency(
    declared: &[f64],
    requested: f64,
    tolerance: f64,
) -> ValidationResult<()> {
    validate_tolerance(tolerance)?;
    if declared.is_empty() {
        return Ok(());
    }

    let requested_units = to_minor_units(requested);
    let tolerance_units = to_minor_units(tolerance);

    let matched = declared
        .iter()
        .any(|price| to_minor_units(*price).abs_diff(requested_units) <= tolerance_units);

    if matched {
        Ok(())
    } else {
        Err(ValidationError::PricingMismatch {
            declared: declared.to_vec(),
            requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portals_types::constants::PRICE_TOLERANCE;

    #[test]
    fn test_empty_declaration_accepts() {
        assert!(check_price_consistency(&[], 7.77, PRICE_TOLERANCE).is_ok());
    }

    #[test]
    fn test_exact_match() {
        assert!(check_price_consistency(&[0.01, 0.05], 0.05, PRICE_TOLERANCE).is_ok());
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(check_price_consistency(&[2.50], 2.5001, PRICE_TOLERANCE).is_ok());
        assert!(check_price_consistency(&[2.50], 2.4999, PRICE_TOLERANCE).is_ok());
        assert_eq!(
            check_price_consistency(&[2.50], 2.5002, PRICE_TOLERANCE),
            Err(ValidationError::PricingMismatch {
                declared: vec![2.50],
                requested: 2.5002
            })
        );
    }

    #[test]
    fn test_unusable_tolerance_rejected() {
        for tolerance in [f64::NAN, f64::INFINITY, -0.0001] {
            assert!(matches!(
                check_price_consistency(&[2.50], 1000.0, tolerance),
                Err(ValidationError::InvalidTolerance { .. })
            ));
        }
        assert_eq!(validate_tolerance(0.0), Ok(0.0));
        assert!(check_price_consistency(&[2.50], 2.50, 0.0).is_ok());
        assert!(check_price_consistency(&[2.50], 2.5001, 0.0).is_err());
    }

    #[test]
    fn test_matches_any_declared_price() {
        // Tiered options from several tools, flattened.
        let declared = [0.01, 0.02, 0.10, 1.00];
        assert!(check_price_consistency(&declared, 0.10, PRICE_TOLERANCE).is_ok());
        assert!(check_price_consistency(&declared, 0.50, PRICE_TOLERANCE).is_err());
    }
}
