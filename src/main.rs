//! DocShare: upload files to a document service and share them by link.
//!
//! Main entry point that loads configuration, initializes logging, and
//! dispatches the command line.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use docshare_cli::Cli;
use docshare_cli::commands::load_config;
use docshare_core::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!("docshare v{} using '{}'", env!("CARGO_PKG_VERSION"), cli.config);

    if let Err(e) = cli.execute(&config).await {
        tracing::debug!(error = %e, "Command failed");
        docshare_cli::output::print_error(e.user_message());
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Output goes to stderr so command output on
/// stdout stays machine readable.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
