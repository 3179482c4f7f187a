//! Connectivity check CLI command.

use crate::output;
use docshare_core::config::AppConfig;
use docshare_core::error::AppError;

/// Execute the check command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let service = super::connect(config)?;

    service.check_access().await?;

    output::print_success("Document service reachable and credentials accepted");
    output::print_kv("Service", &config.remote.base_url);
    output::print_kv("Tenant", &config.remote.tenant_name);
    output::print_kv("Binding", service.binding_name());
    Ok(())
}
