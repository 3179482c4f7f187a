//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;

const DEFAULT_CONFIG: &str = include_str!("../../../../config/default.toml");

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate that the service connection is configured
    Validate,
    /// Write a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let redacted = config.redacted();
            match format {
                OutputFormat::Json => output::print_json(&redacted),
                OutputFormat::Table => {
                    output::print_kv("Base URL", &redacted.remote.base_url);
                    output::print_kv("Tenant", &redacted.remote.tenant_name);
                    output::print_kv("API path", &redacted.remote.api_path);
                    output::print_kv(
                        "Category",
                        &format!(
                            "{} ({})",
                            redacted.remote.category_no, redacted.remote.category_name
                        ),
                    );
                    output::print_kv("Auth method", &format!("{:?}", redacted.remote.auth.method));
                    output::print_kv("Username", &redacted.remote.auth.username);
                    output::print_kv("Password", &redacted.remote.auth.password);
                    output::print_kv("Token", &redacted.remote.auth.token);
                    output::print_kv("Archive name", &redacted.share.archive_name);
                    output::print_kv("Default expiry", &redacted.share.default_expiry);
                    output::print_kv(
                        "Timeout",
                        &format!("{}s", redacted.remote.request_timeout_seconds),
                    );
                }
            }
        }
        ConfigCommand::Validate => {
            config.ensure_configured()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Service", &config.remote.base_url);
            output::print_kv("Category", &config.remote.category_no.to_string());
        }
        ConfigCommand::Generate { output: out_path } => {
            if let Some(parent) = std::path::Path::new(out_path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::internal(format!("Failed to create dir: {e}")))?;
            }
            std::fs::write(out_path, DEFAULT_CONFIG)
                .map_err(|e| AppError::internal(format!("Failed to write config: {e}")))?;
            output::print_success(&format!("Default config written to '{out_path}'"));
        }
    }

    Ok(())
}
