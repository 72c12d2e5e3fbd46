//! Call API command.

use portals_x402::PortalsClient;
use serde_json::Value;
use tracing::info;

use crate::config::PortalsConfig;
use crate::context::ClientContext;
use crate::error::CliResult;
use crate::output::{CallOutput, OutputFormat, Render};

/// Execute the call command.
pub async fn call(
    config: PortalsConfig,
    format: OutputFormat,
    api_id: &str,
    params: Value,
    tool: Option<String>,
) -> CliResult<String> {
    let ctx = ClientContext::new(config)?;
    call_with(&ctx.client, format, api_id, &params, tool.as_deref()).await
}

/// Call through an existing client.
pub async fn call_with(
    client: &PortalsClient,
    format: OutputFormat,
    api_id: &str,
    params: &Value,
    tool: Option<&str>,
) -> CliResult<String> {
    let outcome = client.call_api(api_id, params, tool).await?;

    if let Some(receipt) = &outcome.receipt {
        info!(
            api = api_id,
            amount = receipt.amount,
            destination = %receipt.destination,
            "Paid for call"
        );
    }

    Ok(CallOutput::from(outcome).render(format))
}
