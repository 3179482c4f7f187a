//! Share command: upload files and print the resulting link.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use crate::progress::TerminalObserver;
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;
use docshare_core::types::{Expiry, ShareOptions, ShareReceipt, format_size};
use docshare_session::{SessionState, ShareController};

/// Arguments for the share command
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Files to share
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Protect the link with this password
    #[arg(short, long, conflicts_with = "ask_password")]
    pub password: Option<String>,

    /// Prompt for the link password
    #[arg(long)]
    pub ask_password: bool,

    /// Link expiry: never, a number of days, or YYYY-MM-DD
    #[arg(short, long)]
    pub expires: Option<String>,
}

/// Share result for JSON output
#[derive(Debug, Serialize)]
struct ShareResult<'a> {
    url: &'a str,
    document_no: i64,
    expires_at: Option<String>,
}

/// Execute the share command
pub async fn execute(
    args: &ShareArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let expiry = Expiry::from_str(
        args.expires
            .as_deref()
            .unwrap_or(config.share.default_expiry.as_str()),
    )?;
    let password = if args.ask_password {
        crate::prompt::ask_password()?
    } else {
        args.password.clone()
    };
    let options = ShareOptions::new(password, expiry);

    let service = super::connect(config)?;
    let mut controller = ShareController::new(service)
        .with_observer(Box::new(TerminalObserver::new(format.is_human())));

    for path in &args.files {
        if !controller.add_path(path).await? {
            output::print_warning(&format!("Skipping duplicate '{}'", path.display()));
        }
    }

    if format.is_human() {
        let selection = controller.selection();
        println!(
            "Sharing {} file(s), {} (expires: {}{})",
            selection.len(),
            format_size(selection.total_size()),
            options.expiry,
            if options.is_protected() { ", password protected" } else { "" }
        );
    }

    let upload_id = controller.request(options)?;
    tracing::debug!(upload_id = %upload_id, "Share requested");

    let interrupt = controller.canceller().map(|canceller| {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        })
    });

    let outcome = controller.run_until_settled().await.clone();
    if let Some(task) = interrupt {
        task.abort();
    }
    controller.acknowledge();

    match outcome {
        SessionState::Completed(receipt) => {
            print_receipt(&receipt, format);
            Ok(())
        }
        SessionState::Cancelled => {
            output::print_warning("Upload cancelled.");
            Ok(())
        }
        SessionState::Failed(err) => Err(err),
        other => Err(AppError::internal(format!(
            "share ended in unexpected state '{}'",
            other.name()
        ))),
    }
}

fn print_receipt(receipt: &ShareReceipt, format: OutputFormat) {
    let expires_at = receipt.expires_at.map(|at| at.to_rfc3339());
    match format {
        OutputFormat::Json => output::print_json(&ShareResult {
            url: &receipt.url,
            document_no: receipt.document_no.get(),
            expires_at,
        }),
        OutputFormat::Table => {
            output::print_success("Files shared");
            output::print_kv("Link", &receipt.url);
            output::print_kv("Document", &receipt.document_no.to_string());
            output::print_kv("Expires", expires_at.as_deref().unwrap_or("never"));
        }
    }
}
