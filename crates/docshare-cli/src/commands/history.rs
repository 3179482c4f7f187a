//! Share history CLI command.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;
use docshare_core::types::ShareHistoryEntry;
use docshare_session::{FixedAnswer, HistoryManager, HistoryView};

/// History display row for table output
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    /// Link ID
    #[tabled(rename = "Link ID")]
    link_id: String,
    /// File name
    #[tabled(rename = "File")]
    filename: String,
    /// Document number
    #[tabled(rename = "Doc")]
    document_no: i64,
    /// Created at
    #[tabled(rename = "Created")]
    created_at: String,
    /// Expires at
    #[tabled(rename = "Expires")]
    expires_at: String,
    /// Password protected
    #[tabled(rename = "Password")]
    password: String,
    /// Category
    #[tabled(rename = "Category")]
    category: String,
    /// URL
    #[tabled(rename = "URL")]
    url: String,
}

impl HistoryRow {
    /// Build a row, marking links whose expiry is behind `now`.
    fn new(entry: &ShareHistoryEntry, now: DateTime<Utc>) -> Self {
        let mut expires_at = entry
            .expires_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        if entry.is_expired(now) {
            expires_at.push_str(" (expired)");
        }

        Self {
            link_id: entry.link_id.to_string(),
            filename: entry.filename.clone(),
            document_no: entry.document_no.get(),
            created_at: entry
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            expires_at,
            password: if entry.has_password { "yes" } else { "no" }.to_string(),
            category: entry.category_name.clone(),
            url: entry.url.clone(),
        }
    }
}

/// Print a history view in the selected format
pub fn print_view(view: &HistoryView, format: OutputFormat) {
    match view {
        HistoryView::Entries(entries) => {
            let now = Utc::now();
            let rows: Vec<HistoryRow> = entries.iter().map(|e| HistoryRow::new(e, now)).collect();
            output::print_list(&rows, format, "No shared links yet.");
        }
        HistoryView::Empty => {
            output::print_list::<HistoryRow>(&[], format, "No shared links yet.");
        }
        HistoryView::Unavailable(message) => {
            output::print_error(&format!("Could not load share history: {message}"));
        }
    }
}

/// Execute the history command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let service = super::connect(config)?;
    let manager = HistoryManager::new(service, Arc::new(FixedAnswer(false)));
    print_view(&manager.render().await, format);
    Ok(())
}
