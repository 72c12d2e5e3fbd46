//! Binding a challenge's destination to the registry vault.
//!
//! The registry records a payment vault per API. A stablecoin transfer lands
//! in an associated token account, so a challenge may name either:
//!
//! - the vault's token account itself, which is paid directly, or
//! - an owner whose token account *is* the vault, in which case the vault is
//!   paid.
//!
//! Anything else is a mismatch. The returned address is always the account
//! the transfer should credit.

use portals_crypto::{associated_token_address, Address};
use tracing::{debug, warn};

use crate::error::{ValidationError, ValidationResult};

/// Verify a challenge destination against the trusted vault.
///
/// `vault` must come from a freshly decoded registry record. Returns the
/// token account to pay.
pub fn verify_payment_destination(
    vault: &Address,
    destination: &str,
    mint: &Address,
) -> ValidationResult<Address> {
    let expected = associated_token_address(vault, mint).map_err(|e| ValidationError::Derivation {
        vault: vault.to_string(),
        reason: e.to_string(),
    })?;

    let mismatch = || ValidationError::PaymentAddressMismatch {
        expected: expected.to_string(),
        received: destination.to_string(),
    };

    let destination_addr: Address = match destination.parse() {
        Ok(addr) => addr,
        Err(_) => {
            warn!(destination = %destination, "Challenge destination is not a valid address");
            return Err(mismatch());
        }
    };

    if destination_addr == expected {
        debug!(destination = %destination_addr, "Destination is the vault token account");
        return Ok(destination_addr);
    }

    // Owner form: the challenge names the owner of the vault token account.
    if let Ok(owner_ata) = associated_token_address(&destination_addr, mint) {
        if owner_ata == *vault {
            debug!(owner = %destination_addr, vault = %vault, "Destination owns the vault");
            return Ok(*vault);
        }
    }

    warn!(
        expected = %expected,
        received = %destination_addr,
        "Challenge destination does not match registry vault"
    );
    Err(mismatch())
}
