//! Client facade: registry lookup plus negotiation.

use std::sync::Arc;
use std::time::Duration;

use portals_registry::{RecordSource, RegistryClient, RegistryRecord, RpcRecordSource};
use portals_valid::{validate_tolerance, DefaultValidator, PriceBounds, Validator, ValidatorConfig};
use serde_json::Value;
use tracing::{debug, info};

use crate::builder::PaymentBuilder;
use crate::error::{X402Error, X402Result};
use crate::negotiator::{CallOutcome, Negotiator, NegotiatorConfig};
use crate::schema::ToolDescriptor;
use crate::transport::{ApiTransport, HttpTransport};
use crate::types::X402Config;

/// Calls registry-listed APIs, paying per call when challenged.
///
/// The registry record is fetched fresh for every call.
#[derive(Clone)]
pub struct PortalsClient {
    registry: RegistryClient,
    negotiator: Negotiator,
}

impl PortalsClient {
    /// Assemble a client from its parts.
    pub fn new(registry: RegistryClient, negotiator: Negotiator) -> Self {
        Self {
            registry,
            negotiator,
        }
    }

    /// Client over JSON-RPC and HTTP for the configured cluster.
    pub fn from_config(config: &X402Config, builder: Arc<dyn PaymentBuilder>) -> X402Result<Self> {
        let source: Arc<dyn RecordSource> = Arc::new(RpcRecordSource::new(&config.rpc_endpoint())?);
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new());
        Self::with_collaborators(config, source, transport, builder)
    }

    /// Client over caller-supplied account source and transport.
    pub fn with_collaborators(
        config: &X402Config,
        source: Arc<dyn RecordSource>,
        transport: Arc<dyn ApiTransport>,
        builder: Arc<dyn PaymentBuilder>,
    ) -> X402Result<Self> {
        let network = config.network.config();
        let mint = network
            .usdc_mint_address()
            .map_err(|e| X402Error::Config(format!("invalid USDC mint for {}: {}", config.network, e)))?;
        let bounds = PriceBounds::new(config.min_amount, config.max_amount)?;
        let tolerance = validate_tolerance(config.price_tolerance)?;

        let validator: Arc<dyn Validator> = Arc::new(DefaultValidator::new(
            ValidatorConfig::new(mint)
                .with_bounds(bounds)
                .with_tolerance(tolerance),
        ));

        let negotiator = Negotiator::new(transport, builder, validator).with_config(NegotiatorConfig {
            schema_timeout: Duration::from_secs(config.schema_timeout_secs),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        });

        debug!(network = %config.network, rpc = %config.rpc_endpoint(), "Client configured");
        Ok(Self::new(RegistryClient::new(source), negotiator))
    }

    /// Look up an API's registry record.
    pub async fn get_api(&self, api_id: &str) -> X402Result<RegistryRecord> {
        Ok(self.registry.get_api_str(api_id).await?)
    }

    /// List an API's tools from its OpenAPI document.
    pub async fn get_tools(&self, api_id: &str) -> X402Result<Vec<ToolDescriptor>> {
        let record = self.get_api(api_id).await?;
        self.negotiator.fetch_tools(&record.url).await
    }

    /// Call an API, paying if the server asks for it.
    pub async fn call_api(
        &self,
        api_id: &str,
        params: &Value,
        tool_name: Option<&str>,
    ) -> X402Result<CallOutcome> {
        let record = self.get_api(api_id).await?;
        info!(api = %record.address, title = %record.title, tool = ?tool_name, "Calling API");
        self.negotiator.negotiate(&record, params, tool_name).await
    }

    /// The underlying negotiator.
    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }
}
