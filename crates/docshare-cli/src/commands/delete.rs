//! Delete CLI command.

use clap::Args;

use crate::output::{self, OutputFormat};
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;
use docshare_core::types::DocumentNo;
use docshare_session::{HistoryManager, MutationOutcome};

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Document number as shown by `docshare history`
    pub document_no: DocumentNo,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the delete command
pub async fn execute(
    args: &DeleteArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::connect(config)?;
    let manager = HistoryManager::new(service, super::confirm_gate(args.yes));

    match manager.delete(args.document_no).await? {
        MutationOutcome::Declined => output::print_warning("Cancelled."),
        MutationOutcome::Applied => {
            if format.is_human() {
                output::print_success(&format!("Document {} deleted", args.document_no));
            }
            super::history::print_view(&manager.render().await, format);
        }
    }
    Ok(())
}
