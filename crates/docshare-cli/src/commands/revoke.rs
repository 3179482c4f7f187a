//! Revoke CLI command.

use clap::Args;

use crate::output::{self, OutputFormat};
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;
use docshare_core::types::LinkId;
use docshare_session::{HistoryManager, MutationOutcome};

/// Arguments for the revoke command
#[derive(Debug, Args)]
pub struct RevokeArgs {
    /// Link ID as shown by `docshare history`
    pub link_id: LinkId,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the revoke command
pub async fn execute(
    args: &RevokeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::connect(config)?;
    let manager = HistoryManager::new(service, super::confirm_gate(args.yes));

    match manager.revoke(&args.link_id).await? {
        MutationOutcome::Declined => output::print_warning("Cancelled."),
        MutationOutcome::Applied => {
            if format.is_human() {
                output::print_success(&format!("Shared link '{}' revoked", args.link_id));
            }
            super::history::print_view(&manager.render().await, format);
        }
    }
    Ok(())
}
