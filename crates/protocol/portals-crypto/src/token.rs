//! Token program addresses and associated token account derivation.

use crate::error::CryptoError;
use crate::pda::find_program_address;
use crate::Address;

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxL1b2x1QZmrNnY8EzjKhNRMGnHxSfKk";

/// USDC mint on mainnet-beta.
pub const USDC_MINT_MAINNET: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// USDC mint on devnet.
pub const USDC_MINT_DEVNET: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";

/// Derive the associated token account for `owner` holding `mint`.
///
/// Seeds are `[owner, token_program, mint]` under the associated token
/// program. Off-curve owners (e.g. program vaults) are allowed.
pub fn associated_token_address(owner: &Address, mint: &Address) -> Result<Address, CryptoError> {
    let token_program: Address = TOKEN_PROGRAM_ID.parse()?;
    let ata_program: Address = ASSOCIATED_TOKEN_PROGRAM_ID.parse()?;

    let (address, _bump) = find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ata_program,
    )?;
    Ok(address)
}
