//! Output formatting for CLI.

use colored::Colorize;
use portals_registry::RegistryRecord;
use portals_types::{format_usdc, from_minor_units};
use portals_x402::{format_pricing, CallOutcome, NegotiationState, ToolDescriptor};
use serde::Serialize;
use serde_json::Value;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for the show command.
#[derive(Debug, Serialize)]
pub struct RecordOutput {
    pub address: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub provider: String,
    pub payment_vault: String,
    /// USDC account payments are sent to, when derivable.
    pub payment_token_account: Option<String>,
    pub collateral_vault: String,
    pub collateral_amount: u64,
    pub total_claimed: u64,
    pub suspended: bool,
    pub created_at: i64,
    pub last_updated: i64,
}

impl RecordOutput {
    /// Build from a decoded record and its derived USDC account.
    pub fn new(record: &RegistryRecord, payment_token_account: Option<String>) -> Self {
        Self {
            address: record.address.to_string(),
            title: record.title.clone(),
            description: record.description.clone(),
            url: record.url.clone(),
            provider: record.provider.to_string(),
            payment_vault: record.payment_vault.to_string(),
            payment_token_account,
            collateral_vault: record.collateral_vault.to_string(),
            collateral_amount: record.collateral_amount,
            total_claimed: record.total_claimed,
            suspended: record.suspended,
            created_at: record.created_at,
            last_updated: record.last_updated,
        }
    }
}

impl Render for RecordOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!("{} \"{}\"", "Title:".bold(), self.title)];
        if self.suspended {
            lines.push(format!("{}", "SUSPENDED".red().bold()));
        }
        lines.push(format!("{} {}", "Address:".bold(), self.address));
        if !self.description.is_empty() {
            lines.push(format!("{} {}", "Description:".bold(), self.description));
        }
        lines.push(format!("{} {}", "URL:".bold(), self.url));
        lines.push(format!("{} {}", "Provider:".bold(), self.provider));
        lines.push(format!("{} {}", "Payment Vault:".bold(), self.payment_vault));
        if let Some(account) = &self.payment_token_account {
            lines.push(format!("{} {}", "Pays To:".bold(), account.cyan()));
        }
        lines.push(format!(
            "{} {} ({} claimed)",
            "Collateral:".bold(),
            format_units(self.collateral_amount),
            format_units(self.total_claimed)
        ));
        lines.push(format!("{} {}", "Updated:".bold(), self.last_updated));
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One tool in the tools listing.
#[derive(Debug, Serialize)]
pub struct ToolSummary {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    pub summary: Option<String>,
    pub pricing: String,
}

impl From<&ToolDescriptor> for ToolSummary {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            operation_id: tool.operation_id.clone(),
            method: tool.method.clone(),
            path: tool.path.clone(),
            summary: tool.summary.clone(),
            pricing: format_pricing(tool.pricing.as_ref()),
        }
    }
}

/// Output for the tools command.
#[derive(Debug, Serialize)]
pub struct ToolsOutput {
    pub api: String,
    pub tools: Vec<ToolSummary>,
    pub total: usize,
}

impl Render for ToolsOutput {
    fn render_human(&self) -> String {
        if self.tools.is_empty() {
            return "No tools found.".dimmed().to_string();
        }

        let mut lines = vec![format!("{} ({})", "TOOLS".green().bold(), self.total)];
        for tool in &self.tools {
            lines.push(format!(
                "  {} {} {}  {}",
                tool.operation_id.cyan(),
                tool.method.dimmed(),
                tool.path,
                tool.pricing.yellow()
            ));
            if let Some(summary) = &tool.summary {
                lines.push(format!("      {}", summary.dimmed()));
            }
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Payment details for a paid call.
#[derive(Debug, Serialize)]
pub struct PaymentSummary {
    pub amount: f64,
    pub currency: String,
    pub destination: String,
}

/// Output for the call command.
#[derive(Debug, Serialize)]
pub struct CallOutput {
    pub body: Value,
    pub payment: Option<PaymentSummary>,
    pub trace: Vec<NegotiationState>,
}

impl From<CallOutcome> for CallOutput {
    fn from(outcome: CallOutcome) -> Self {
        Self {
            payment: outcome.receipt.map(|r| PaymentSummary {
                amount: r.amount,
                currency: r.currency,
                destination: r.destination.to_string(),
            }),
            body: outcome.body,
            trace: outcome.trace,
        }
    }
}

impl Render for CallOutput {
    fn render_human(&self) -> String {
        let mut lines = Vec::new();
        match &self.payment {
            Some(payment) => lines.push(format!(
                "{} {} to {}",
                "Paid:".green().bold(),
                format_usdc(payment.amount),
                payment.destination
            )),
            None => lines.push(format!("{}", "No payment required".dimmed())),
        }
        let body = match &self.body {
            Value::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        };
        lines.push(body);
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Format token minor units as a decimal amount.
pub fn format_units(units: u64) -> String {
    format!("{:.2}", from_minor_units(units))
}
