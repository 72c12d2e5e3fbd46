//! Program derived addresses.
//!
//! A program derived address (PDA) is computed as
//!
//! ```text
//! PDA = SHA256(seed_0 || ... || seed_n || program_id || "ProgramDerivedAddress")
//! ```
//!
//! and is only valid when the resulting 32 bytes do NOT decode to a point on
//! the ed25519 curve, so no private key can exist for it. `find_program_address`
//! appends a one-byte bump seed, searching from 255 downwards for the first
//! off-curve result.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::Address;

/// Maximum number of seeds (including the bump).
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Domain marker appended to every PDA hash.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Returns true if the bytes decompress to a valid ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

/// Derive a program address from an exact seed list.
///
/// # Errors
/// - `MaxSeedLengthExceeded` if there are too many seeds or one is too long
/// - `InvalidSeeds` if the hash lands on the curve
pub fn create_program_address(seeds: &[&[u8]], program_id: &Address) -> Result<Address, CryptoError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CryptoError::MaxSeedLengthExceeded);
    }
    if seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(CryptoError::MaxSeedLengthExceeded);
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return Err(CryptoError::InvalidSeeds);
    }

    Ok(Address(hash))
}

/// Find the canonical program address and its bump seed.
///
/// Tries bumps from 255 down to 0 and returns the first off-curve address.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    // One slot is reserved for the bump.
    if seeds.len() >= MAX_SEEDS {
        return Err(CryptoError::MaxSeedLengthExceeded);
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(CryptoError::InvalidSeeds) => {}
            Err(e) => return Err(e),
        }
    }

    Err(CryptoError::NoViableBump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID, USDC_MINT_MAINNET};

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_find_program_address_known_vector() {
        let owner = Address([0x11; 32]);
        let token_program = addr(TOKEN_PROGRAM_ID);
        let mint = addr(USDC_MINT_MAINNET);
        let program = addr(ASSOCIATED_TOKEN_PROGRAM_ID);

        let (pda, bump) = find_program_address(
            &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
            &program,
        )
        .unwrap();

        assert_eq!(pda.to_string(), "E7NuY4h3WV7H1xBZ5j3mAA2HmuWkJcxuN9kwuPnTxzXA");
        assert_eq!(bump, 247);
        assert!(!is_on_curve(pda.as_bytes()));
    }

    #[test]
    fn test_create_program_address_with_found_bump() {
        let owner = Address([0x11; 32]);
        let token_program = addr(TOKEN_PROGRAM_ID);
        let mint = addr(USDC_MINT_MAINNET);
        let program = addr(ASSOCIATED_TOKEN_PROGRAM_ID);

        let derived = create_program_address(
            &[owner.as_ref(), token_program.as_ref(), mint.as_ref(), &[247]],
            &program,
        )
        .unwrap();
        assert_eq!(derived.to_string(), "E7NuY4h3WV7H1xBZ5j3mAA2HmuWkJcxuN9kwuPnTxzXA");

        // Higher bumps for this owner land on the curve.
        let on_curve = create_program_address(
            &[owner.as_ref(), token_program.as_ref(), mint.as_ref(), &[255]],
            &program,
        );
        assert_eq!(on_curve, Err(CryptoError::InvalidSeeds));
    }

    #[test]
    fn test_seed_too_long() {
        let program = Address([1; 32]);
        let long_seed = [0u8; MAX_SEED_LEN + 1];
        assert_eq!(
            create_program_address(&[&long_seed], &program),
            Err(CryptoError::MaxSeedLengthExceeded)
        );
    }

    #[test]
    fn test_too_many_seeds() {
        let program = Address([1; 32]);
        let seed: &[u8] = b"x";
        let seeds = vec![seed; MAX_SEEDS];
        assert_eq!(
            find_program_address(&seeds, &program),
            Err(CryptoError::MaxSeedLengthExceeded)
        );
    }

    #[test]
    fn test_is_on_curve() {
        // The ed25519 base point (y = 4/5) in compressed form.
        let base_point: [u8; 32] = [
            0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66,
        ];
        assert!(is_on_curve(&base_point));
    }
}
