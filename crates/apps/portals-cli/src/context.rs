//! Client construction from CLI configuration.

use std::sync::Arc;

use async_trait::async_trait;
use portals_x402::{
    PaymentBuilder, PortalsClient, RemotePaymentBuilder, SignedTransaction, TransferRequest,
    X402Error, X402Result,
};
use tracing::debug;

use crate::config::{PortalsConfig, ENV_SIGNER_URL};
use crate::error::CliResult;

/// A configured client plus the settings it was built from.
pub struct ClientContext {
    /// Effective configuration.
    pub config: PortalsConfig,
    /// Client over JSON-RPC and HTTP.
    pub client: PortalsClient,
}

impl ClientContext {
    /// Build a client for the configured cluster and signer.
    pub fn new(config: PortalsConfig) -> CliResult<Self> {
        let x402 = config.to_x402_config();
        let builder = payment_builder(&config)?;
        let client = PortalsClient::from_config(&x402, builder)?;
        Ok(Self { config, client })
    }
}

/// The signer from `[payment] signer_url`, or one that refuses to pay.
pub fn payment_builder(config: &PortalsConfig) -> CliResult<Arc<dyn PaymentBuilder>> {
    match &config.payment.signer_url {
        Some(url) => {
            debug!(signer = %url, "Using remote signer");
            let builder = RemotePaymentBuilder::new(url, config.network.cluster.config())?;
            Ok(Arc::new(builder))
        }
        None => Ok(Arc::new(NoSigner)),
    }
}

/// Payment builder used when no signer is configured.
///
/// Free calls still work; the first challenge fails with `PaymentBuild`.
pub struct NoSigner;

#[async_trait]
impl PaymentBuilder for NoSigner {
    async fn build(&self, _request: &TransferRequest) -> X402Result<SignedTransaction> {
        Err(X402Error::PaymentBuild {
            reason: format!(
                "no signer configured; set [payment] signer_url or {}",
                ENV_SIGNER_URL
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portals_crypto::Address;

    #[tokio::test]
    async fn test_no_signer_refuses() {
        let request = TransferRequest {
            destination: Address([0x11; 32]),
            amount: 0.05,
            fee_payer: None,
            chain: "solana".to_string(),
        };
        let err = NoSigner.build(&request).await.unwrap_err();
        assert!(matches!(err, X402Error::PaymentBuild { .. }));
        assert!(err.to_string().contains(ENV_SIGNER_URL));
    }

    #[test]
    fn test_context_builds_without_network() {
        let mut config = PortalsConfig::default();
        config.payment.signer_url = Some("http://127.0.0.1:9000/sign".to_string());
        assert!(ClientContext::new(config).is_ok());
    }

    #[test]
    fn test_context_rejects_bad_bounds() {
        let mut config = PortalsConfig::default();
        config.payment.min_amount = 5.0;
        config.payment.max_amount = 1.0;
        assert!(ClientContext::new(config).is_err());
    }

    #[test]
    fn test_context_rejects_negative_tolerance() {
        let mut config = PortalsConfig::default();
        config.payment.tolerance = -0.5;
        let err = ClientContext::new(config).err().unwrap();
        assert_eq!(err.exit_code(), 3);
    }
}
