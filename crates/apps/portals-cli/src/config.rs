//! CLI configuration.

use portals_types::constants::{
    API_CALL_TIMEOUT_SECS, DEFAULT_MAX_PAYMENT, DEFAULT_MIN_PAYMENT, PRICE_TOLERANCE,
    SCHEMA_FETCH_TIMEOUT_SECS,
};
use portals_types::Network;
use portals_x402::X402Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Overrides `[network] cluster`.
pub const ENV_NETWORK: &str = "PORTALS_NETWORK";
/// Overrides `[network] rpc_url`.
pub const ENV_RPC_URL: &str = "PORTALS_RPC_URL";
/// Overrides `[payment] signer_url`.
pub const ENV_SIGNER_URL: &str = "PORTALS_SIGNER_URL";

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalsConfig {
    /// Cluster and RPC endpoint.
    pub network: NetworkSection,
    /// Payment limits and signer.
    pub payment: PaymentSection,
    /// Time limits.
    pub timeouts: TimeoutSection,
}

impl PortalsConfig {
    /// Load configuration from a file, then apply `PORTALS_*` overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a file only.
    pub fn load_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply overrides from `lookup` (the process environment in [`load`](Self::load)).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cluster) = lookup(ENV_NETWORK) {
            self.network.cluster = cluster
                .parse()
                .map_err(|e| CliError::config(format!("{}: {}", ENV_NETWORK, e)))?;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.network.rpc_url = Some(url);
        }
        if let Some(url) = lookup(ENV_SIGNER_URL) {
            self.payment.signer_url = Some(url);
        }
        Ok(())
    }

    /// Client settings for this configuration.
    pub fn to_x402_config(&self) -> X402Config {
        X402Config {
            network: self.network.cluster,
            rpc_url: self.network.rpc_url.clone(),
            min_amount: self.payment.min_amount,
            max_amount: self.payment.max_amount,
            price_tolerance: self.payment.tolerance,
            schema_timeout_secs: self.timeouts.schema_secs,
            call_timeout_secs: self.timeouts.call_secs,
        }
    }
}

/// Network configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    /// Cluster ("devnet" or "mainnet-beta").
    pub cluster: Network,
    /// JSON-RPC endpoint; the cluster default when unset.
    pub rpc_url: Option<String>,
}

/// Payment configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSection {
    /// Smallest payment accepted (USDC).
    pub min_amount: f64,
    /// Largest payment accepted (USDC).
    pub max_amount: f64,
    /// Allowed gap between requested and declared prices (USDC).
    pub tolerance: f64,
    /// Signing service that builds payment transactions.
    pub signer_url: Option<String>,
}

impl Default for PaymentSection {
    fn default() -> Self {
        Self {
            min_amount: DEFAULT_MIN_PAYMENT,
            max_amount: DEFAULT_MAX_PAYMENT,
            tolerance: PRICE_TOLERANCE,
            signer_url: None,
        }
    }
}

/// Timeout configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    /// OpenAPI document fetch limit.
    pub schema_secs: u64,
    /// Per-call limit.
    pub call_secs: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            schema_secs: SCHEMA_FETCH_TIMEOUT_SECS,
            call_secs: API_CALL_TIMEOUT_SECS,
        }
    }
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("io", "portals", "portals")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".portals")
        })
        .join("config.toml")
}
