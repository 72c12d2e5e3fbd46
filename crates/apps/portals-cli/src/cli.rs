//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Portals CLI.
#[derive(Parser, Debug)]
#[command(name = "portals")]
#[command(author = "Portals Contributors")]
#[command(version)]
#[command(about = "Call registry-listed APIs, paying per call over x402")]
#[command(
    long_about = "Looks APIs up in the on-chain Portals registry and calls them.\n\nWhen an API answers 402 Payment Required, the amount is checked against\nyour limits and the API's declared prices, the destination is checked\nagainst the registered vault, and only then is the payment signed."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show an API's registry record.
    ///
    /// Includes the USDC account payments for this API must go to.
    Show {
        /// Registry entry address (base58).
        api_id: String,
    },

    /// List an API's tools and prices.
    ///
    /// Reads the API's OpenAPI document.
    Tools {
        /// Registry entry address (base58).
        api_id: String,
    },

    /// Call an API, paying if it asks for payment.
    Call {
        /// Registry entry address (base58).
        api_id: String,

        /// Tool (operationId) to call; the API base URL when omitted.
        #[arg(short, long)]
        tool: Option<String>,

        /// Parameters as a JSON object.
        #[arg(long, value_parser = parse_params_object)]
        params: Option<Value>,

        /// Single parameter as key=value; the value is JSON if it parses.
        #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
        param: Vec<(String, Value)>,
    },
}

/// Parse `--params`, which must be a JSON object.
fn parse_params_object(s: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_object() {
        return Err("params must be a JSON object".to_string());
    }
    Ok(value)
}

/// Parse `key=value`, keeping the value as a string when it is not JSON.
fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not key=value", s))?;
    if key.is_empty() {
        return Err("parameter name cannot be empty".to_string());
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Merge `--params` and `--param` into one object; single params win.
pub fn merge_params(params: Option<Value>, pairs: Vec<(String, Value)>) -> Value {
    let mut object = match params {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in pairs {
        object.insert(key, value);
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_call_args() {
        let cli = Cli::try_parse_from([
            "portals",
            "call",
            "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2",
            "--tool",
            "getForecast",
            "--params",
            r#"{"city":"Lisbon"}"#,
            "-p",
            "days=3",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.format, OutputFormatArg::Json));
        let Commands::Call {
            api_id,
            tool,
            params,
            param,
        } = cli.command
        else {
            panic!("expected call");
        };
        assert_eq!(api_id, "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2");
        assert_eq!(tool.as_deref(), Some("getForecast"));
        assert_eq!(
            merge_params(params, param),
            json!({ "city": "Lisbon", "days": 3 })
        );
    }

    #[test]
    fn test_params_must_be_object() {
        let result = Cli::try_parse_from(["portals", "call", "abc", "--params", "[1,2]"]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("JSON object"), "got: {}", err);
    }

    #[test]
    fn test_key_value() {
        assert_eq!(
            parse_key_value("city=Lisbon").unwrap(),
            ("city".to_string(), json!("Lisbon"))
        );
        assert_eq!(
            parse_key_value("flag=true").unwrap(),
            ("flag".to_string(), json!(true))
        );
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), json!("a=b"))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_merge_params_single_wins() {
        let merged = merge_params(
            Some(json!({ "range": "day", "city": "Porto" })),
            vec![("range".to_string(), json!("decade"))],
        );
        assert_eq!(merged, json!({ "range": "decade", "city": "Porto" }));
        assert_eq!(merge_params(None, Vec::new()), json!({}));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["portals", "show", "abc", "-v", "-c", "/tmp/p.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        assert!(matches!(cli.command, Commands::Show { .. }));
    }
}
