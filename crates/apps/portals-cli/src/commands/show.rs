//! Show registry record command.

use portals_crypto::associated_token_address;
use portals_types::Network;
use portals_x402::PortalsClient;
use tracing::warn;

use crate::config::PortalsConfig;
use crate::context::ClientContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, RecordOutput, Render};

/// Execute the show command.
pub async fn show(config: PortalsConfig, format: OutputFormat, api_id: &str) -> CliResult<String> {
    let ctx = ClientContext::new(config)?;
    show_with(&ctx.client, ctx.config.network.cluster, format, api_id).await
}

/// Show a record through an existing client.
pub async fn show_with(
    client: &PortalsClient,
    network: Network,
    format: OutputFormat,
    api_id: &str,
) -> CliResult<String> {
    let record = client.get_api(api_id).await?;

    let derived = network
        .config()
        .usdc_mint_address()
        .and_then(|mint| associated_token_address(&record.payment_vault, &mint));
    let token_account = match derived {
        Ok(account) => Some(account.to_string()),
        Err(e) => {
            warn!(vault = %record.payment_vault, error = %e, "Cannot derive vault token account");
            None
        }
    };

    Ok(RecordOutput::new(&record, token_account).render(format))
}
