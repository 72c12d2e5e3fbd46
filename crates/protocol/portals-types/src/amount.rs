//! Decimal USDC <-> integer micro-units.

use crate::constants::MICRO_UNITS_PER_USDC;
use crate::Amount;

/// Convert a decimal USDC amount to micro-units, rounding to the nearest unit.
///
/// Non-finite and negative inputs map to zero.
pub fn to_minor_units(usdc: f64) -> Amount {
    if !usdc.is_finite() || usdc <= 0.0 {
        return 0;
    }
    (usdc * MICRO_UNITS_PER_USDC as f64).round() as Amount
}

/// Convert micro-units to a decimal USDC amount.
pub fn from_minor_units(units: Amount) -> f64 {
    units as f64 / MICRO_UNITS_PER_USDC as f64
}

/// Format a decimal USDC amount for display.
///
/// Sub-cent amounts keep three decimals, everything else two.
pub fn format_usdc(usdc: f64) -> String {
    if usdc < 0.01 {
        format!("${:.3} USDC", usdc)
    } else {
        format!("${:.2} USDC", usdc)
    }
}
