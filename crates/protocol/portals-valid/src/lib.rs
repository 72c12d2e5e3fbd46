//! Payment challenge checks for the Portals client.
//!
//! Before any funds move, a payment challenge has to pass three checks:
//!
//! - **Amount bounds**: the requested amount is positive and within the
//!   configured minimum and maximum
//! - **Price consistency**: the amount matches a price the API declares in
//!   its schema, within a small tolerance
//! - **Destination**: the payment lands in the token account bound to the
//!   vault recorded in the on-chain registry
//!
//! Each check is a standalone function; [`DefaultValidator`] bundles them
//! behind the [`Validator`] trait.
//!
//! ```
//! use portals_valid::{check_price_consistency, validate_amount, PriceBounds};
//!
//! let bounds = PriceBounds::default();
//! assert!(validate_amount(0.05, &bounds).is_ok());
//! assert!(validate_amount(25.0, &bounds).is_err());
//!
//! assert!(check_price_consistency(&[0.05, 0.10], 0.05, 0.0001).is_ok());
//! assert!(check_price_consistency(&[0.05, 0.10], 0.07, 0.0001).is_err());
//! ```

pub mod consistency;
pub mod error;
pub mod price;
pub mod validator;
pub mod vault;

pub use consistency::{check_price_consistency, validate_tolerance};
pub use error::{ValidationError, ValidationResult};
pub use price::{validate_amount, PriceBounds};
pub use validator::{DefaultValidator, Validator, ValidatorConfig};
pub use vault::verify_payment_destination;
