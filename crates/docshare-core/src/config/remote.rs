//! Remote document service connection and credential configuration.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Connection settings for the remote document-management service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Service base URL, e.g. `https://tenant.example.com`.
    #[serde(default)]
    pub base_url: String,
    /// Tenant name sent in the `TenantName` header.
    #[serde(default)]
    pub tenant_name: String,
    /// Path between the base URL and the endpoint name.
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Category that receives uploaded documents (`0` = not chosen yet).
    #[serde(default)]
    pub category_no: i64,
    /// Display name of the configured category.
    #[serde(default)]
    pub category_name: String,
    /// Whole-request timeout in seconds. Large uploads need a generous value.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Credentials used for every request.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tenant_name: String::new(),
            api_path: default_api_path(),
            category_no: 0,
            category_name: String::new(),
            request_timeout_seconds: default_request_timeout(),
            auth: AuthConfig::default(),
        }
    }
}

/// How the `Authorization` header is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// `Basic base64(username:password)`.
    Basic,
    /// `Bearer <token>`.
    #[default]
    Bearer,
    /// The token is sent verbatim.
    Raw,
}

/// Credentials for the document service.
///
/// Credentials are read from configuration or `DOCSHARE__REMOTE__AUTH__*`
/// environment variables; nothing is persisted by DocShare itself.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Header construction method.
    #[serde(default)]
    pub method: AuthMethod,
    /// Username for basic authentication.
    #[serde(default)]
    pub username: String,
    /// Password for basic authentication.
    #[serde(default)]
    pub password: String,
    /// Token for bearer or raw authentication.
    #[serde(default)]
    pub token: String,
}

impl AuthConfig {
    /// Build the `Authorization` header value.
    ///
    /// Falls back to the raw token when the chosen method lacks its inputs,
    /// and fails only when nothing usable is configured.
    pub fn header_value(&self) -> AppResult<String> {
        let value = match self.method {
            AuthMethod::Basic if !self.username.is_empty() && !self.password.is_empty() => {
                basic_auth_token(&self.username, &self.password)
            }
            AuthMethod::Bearer if !self.token.is_empty() => bearer_auth_token(&self.token),
            _ => self.token.clone(),
        };

        if value.is_empty() {
            return Err(AppError::configuration(
                "no authentication token provided",
            ));
        }
        Ok(value)
    }

    /// Whether any credential is present.
    pub fn has_credentials(&self) -> bool {
        !self.token.is_empty() || (!self.username.is_empty() && !self.password.is_empty())
    }
}

/// Build a `Basic` authorization value from a username and password.
pub fn basic_auth_token(username: &str, password: &str) -> String {
    let credentials = format!("{username}:{password}");
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// Build a `Bearer` authorization value, keeping an existing prefix.
pub fn bearer_auth_token(token: &str) -> String {
    let has_prefix = token
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
    if has_prefix && token.len() > 7 {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

fn default_api_path() -> String {
    "theservice/v0001/restun".to_string()
}

fn default_request_timeout() -> u64 {
    300
}
