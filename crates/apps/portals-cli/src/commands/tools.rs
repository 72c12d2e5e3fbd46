//! List tools command.

use portals_x402::PortalsClient;

use crate::config::PortalsConfig;
use crate::context::ClientContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, ToolSummary, ToolsOutput};

/// Execute the tools command.
pub async fn tools(config: PortalsConfig, format: OutputFormat, api_id: &str) -> CliResult<String> {
    let ctx = ClientContext::new(config)?;
    tools_with(&ctx.client, format, api_id).await
}

/// List tools through an existing client.
pub async fn tools_with(
    client: &PortalsClient,
    format: OutputFormat,
    api_id: &str,
) -> CliResult<String> {
    let tools = client.get_tools(api_id).await?;
    let summaries: Vec<ToolSummary> = tools.iter().map(ToolSummary::from).collect();

    let output = ToolsOutput {
        api: api_id.to_string(),
        total: summaries.len(),
        tools: summaries,
    };

    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portals_test_utils::{
        api_address, mock_client, sample_record, weather_schema, MockPaymentBuilder,
        MockRecordSource, MockTransport,
    };

    #[tokio::test]
    async fn test_tools_human() {
        let source = MockRecordSource::new().with_record(&sample_record());
        let transport = MockTransport::new().with_schema(weather_schema());
        let client = mock_client(&source, &transport, &MockPaymentBuilder::new());

        let output = tools_with(&client, OutputFormat::Human, &api_address().to_string())
            .await
            .unwrap();

        assert!(output.contains("getForecast"));
        assert!(output.contains("getHistory"));
        assert!(output.contains("Forecast for a city"));
        assert_eq!(
            transport.schema_requests(),
            vec!["https://weather.example.com/api/openapi.json".to_string()]
        );
    }

    #[tokio::test]
    async fn test_tools_json() {
        let source = MockRecordSource::new().with_record(&sample_record());
        let transport = MockTransport::new().with_schema(weather_schema());
        let client = mock_client(&source, &transport, &MockPaymentBuilder::new());

        let output = tools_with(&client, OutputFormat::Json, &api_address().to_string())
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["tools"][0]["operation_id"], "getForecast");
        assert_eq!(json["tools"][0]["method"], "POST");
    }

    #[tokio::test]
    async fn test_tools_schema_unavailable() {
        let source = MockRecordSource::new().with_record(&sample_record());
        let transport = MockTransport::new().with_schema_failure("404");
        let client = mock_client(&source, &transport, &MockPaymentBuilder::new());

        let err = tools_with(&client, OutputFormat::Human, &api_address().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }
}
