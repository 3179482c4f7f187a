//! Interactive prompts.

use async_trait::async_trait;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_session::ConfirmGate;

/// Confirmation gate asking on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalGate;

#[async_trait]
impl ConfirmGate for TerminalGate {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Confirmation prompt failed, treating as declined");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt task failed");
                false
            }
        }
    }
}

/// Ask for a link password; an empty answer means none.
pub fn ask_password() -> AppResult<Option<String>> {
    let password: String = dialoguer::Password::new()
        .with_prompt("Link password (leave empty for none)")
        .allow_empty_password(true)
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

    Ok(Some(password).filter(|p| !p.is_empty()))
}
