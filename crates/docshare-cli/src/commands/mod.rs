//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod delete;
pub mod history;
pub mod revoke;
pub mod share;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use crate::prompt::TerminalGate;
use docshare_client::ServiceClient;
use docshare_core::config::{AppConfig, DEFAULT_CONFIG_PATH};
use docshare_core::error::AppError;
use docshare_core::traits::DocumentService;
use docshare_session::{ConfirmGate, FixedAnswer};

/// DocShare: upload files to a document service and share them by link
#[derive(Debug, Parser)]
#[command(name = "docshare", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload files and create a shared link
    Share(share::ShareArgs),
    /// List links you have shared
    History,
    /// Revoke a shared link
    Revoke(revoke::RevokeArgs),
    /// Delete a shared document
    Delete(delete::DeleteArgs),
    /// Verify configuration and access to the document service
    Check,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Share(args) => share::execute(args, config, self.format).await,
            Commands::History => history::execute(config, self.format).await,
            Commands::Revoke(args) => revoke::execute(args, config, self.format).await,
            Commands::Delete(args) => delete::execute(args, config, self.format).await,
            Commands::Check => check::execute(config).await,
            Commands::Config(args) => config::execute(args, config, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect to the configured document service
pub fn connect(config: &AppConfig) -> Result<Arc<dyn DocumentService>, AppError> {
    let client = ServiceClient::from_config(config)?;
    Ok(Arc::new(client))
}

/// Helper: confirmation gate, skipped entirely with `--yes`
pub fn confirm_gate(assume_yes: bool) -> Arc<dyn ConfirmGate> {
    if assume_yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(TerminalGate)
    }
}
