//! Network clusters and their well-known addresses.

use std::str::FromStr;

use portals_crypto::{Address, CryptoError, USDC_MINT_DEVNET, USDC_MINT_MAINNET};
use serde::{Deserialize, Serialize};

use crate::constants::USDC_DECIMALS;
use crate::error::TypesError;

/// Registry program (same id on every cluster).
pub const REGISTRY_PROGRAM_ID: &str = "CYWVLuztYg7XX3nRNGiF7JRrcAy6to4BZgQ3PgpbbJ8C";

/// A Solana cluster the client can operate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    /// Public devnet.
    #[serde(rename = "devnet")]
    Devnet,
    /// Production cluster.
    #[default]
    #[serde(rename = "mainnet-beta")]
    MainnetBeta,
}

impl Network {
    /// Cluster name as used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }

    /// Well-known addresses and endpoints for this cluster.
    pub fn config(&self) -> NetworkConfig {
        match self {
            Self::Devnet => NetworkConfig {
                network: *self,
                rpc_endpoint: "https://api.devnet.solana.com",
                usdc_mint: USDC_MINT_DEVNET,
                registry_program_id: REGISTRY_PROGRAM_ID,
                portals_mint: "7TY587cEWBcHtN5wpaJS7JabZLPLt2Ever76sTM8mNKG",
                registry_account: "43CczJDbDnuCuU7NbD8VqQEcxEiQcXWN4HhqbBF68r8N",
                usdc_decimals: USDC_DECIMALS,
            },
            Self::MainnetBeta => NetworkConfig {
                network: *self,
                rpc_endpoint: "https://api.mainnet-beta.solana.com",
                usdc_mint: USDC_MINT_MAINNET,
                registry_program_id: REGISTRY_PROGRAM_ID,
                portals_mint: "4ToEhsZQNThpMcsXxDY4fGFUc28LrCe7HeuiRRCGBAGS",
                registry_account: "3HL31uTgncGMmN2EkjCvPnsyvA3gCaLhwQSPRWo4i8Gr",
                usdc_decimals: USDC_DECIMALS,
            },
        }
    }
}

impl FromStr for Network {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Self::Devnet),
            "mainnet-beta" | "mainnet" => Ok(Self::MainnetBeta),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static addresses for one cluster, kept in their base58 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Cluster this table belongs to.
    pub network: Network,
    /// Default public JSON-RPC endpoint.
    pub rpc_endpoint: &'static str,
    /// USDC mint.
    pub usdc_mint: &'static str,
    /// Registry program.
    pub registry_program_id: &'static str,
    /// Collateral token mint.
    pub portals_mint: &'static str,
    /// Global registry state account.
    pub registry_account: &'static str,
    /// USDC decimals.
    pub usdc_decimals: u8,
}

impl NetworkConfig {
    /// Parsed USDC mint address.
    pub fn usdc_mint_address(&self) -> Result<Address, CryptoError> {
        self.usdc_mint.parse()
    }

    /// Parsed registry program address.
    pub fn registry_program_address(&self) -> Result<Address, CryptoError> {
        self.registry_program_id.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse_and_display() {
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("mainnet-beta".parse::<Network>().unwrap(), Network::MainnetBeta);
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::MainnetBeta);
        assert_eq!(Network::Devnet.to_string(), "devnet");
        assert_eq!(
            "testnet".parse::<Network>(),
            Err(TypesError::UnknownNetwork("testnet".to_string()))
        );
    }

    #[test]
    fn test_default_is_mainnet() {
        assert_eq!(Network::default(), Network::MainnetBeta);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Network::MainnetBeta).unwrap(), "\"mainnet-beta\"");
        let n: Network = serde_json::from_str("\"devnet\"").unwrap();
        assert_eq!(n, Network::Devnet);
    }

    #[test]
    fn test_all_addresses_parse() {
        for network in [Network::Devnet, Network::MainnetBeta] {
            let cfg = network.config();
            assert_eq!(cfg.network, network);
            assert!(cfg.usdc_mint_address().is_ok());
            assert!(cfg.registry_program_address().is_ok());
            assert!(cfg.portals_mint.parse::<Address>().is_ok());
            assert!(cfg.registry_account.parse::<Address>().is_ok());
            assert_eq!(cfg.usdc_decimals, 6);
        }
    }

    #[test]
    fn test_clusters_use_different_mints() {
        assert_ne!(Network::Devnet.config().usdc_mint, Network::MainnetBeta.config().usdc_mint);
    }
}
