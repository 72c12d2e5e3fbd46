//! Portals CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portals_cli::{
    cli::{merge_params, Cli, Commands},
    commands,
    config::{default_config_path, PortalsConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

/// Default filter under `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "warn,portals_cli=debug,portals_x402=debug,portals_registry=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a user-friendly error message with recovery hint.
fn print_error(e: &CliError) {
    eprintln!("{}: {}", "Error".red().bold(), e);

    if e.moves_funds() {
        eprintln!(
            "{}: a payment was already sent for this call",
            "Warning".yellow().bold()
        );
    }

    if let Some(suggestion) = e.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = PortalsConfig::load(&config_path)?;

    // Get output format
    let format: OutputFormat = cli.format.into();

    // Dispatch command
    let output = match cli.command {
        Commands::Show { api_id } => commands::show(config, format, &api_id).await?,

        Commands::Tools { api_id } => commands::tools(config, format, &api_id).await?,

        Commands::Call {
            api_id,
            tool,
            params,
            param,
        } => commands::call(config, format, &api_id, merge_params(params, param), tool).await?,
    };

    println!("{}", output);
    Ok(())
}
