//! HTTP client for the document service REST API.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use docshare_core::config::AppConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentNo, LinkId, ProgressReporter};

use crate::archive::{DEFAULT_ARCHIVE_NAME, Package};
use crate::dto::{
    CreateDocumentRequest, CreateDocumentResponse, CreateSharedLinkRequest,
    CreateSharedLinkResponse, DeleteDocumentRequest, FILE_FORMAT_ORIGINAL, PERMISSION_READ_ONLY,
    RevokeSharedLinkRequest, SHARE_TYPE_PUBLIC, SharedLink, SharedLinkViewEntry, SharedLinksQuery,
    SharedLinksResponse, StreamInfo, parse_create_document,
};
use crate::upload::progress_body;

/// Endpoint called by the access check.
const ACCESS_CHECK_ENDPOINT: &str = "help/operations/GetSystemCustomerId";

/// Client for the document service REST API.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    api_root: String,
    tenant_name: String,
    authorization: String,
    category_no: i64,
    archive_name: String,
    chunk_size: usize,
}

impl ServiceClient {
    /// Build a client from the application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.ensure_configured()?;
        let authorization = config.remote.auth.header_value()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.remote.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        let archive_name = if config.share.archive_name.trim().is_empty() {
            DEFAULT_ARCHIVE_NAME.to_string()
        } else {
            config.share.archive_name.clone()
        };

        Ok(Self {
            http,
            api_root: format!(
                "{}/{}",
                config.remote.base_url.trim_end_matches('/'),
                config.remote.api_path.trim_matches('/')
            ),
            tenant_name: config.remote.tenant_name.clone(),
            authorization,
            category_no: config.remote.category_no,
            archive_name,
            chunk_size: config.upload.chunk_size_bytes,
        })
    }

    /// Name used for multi-file archives.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Full URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.endpoint_url(endpoint))
            .header(AUTHORIZATION, &self.authorization)
            .header("TenantName", &self.tenant_name)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
    }

    async fn post_json<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> AppResult<Bytes> {
        let body = serde_json::to_vec(body)?;
        self.execute(endpoint, self.request(Method::POST, endpoint).body(body))
            .await
    }

    async fn execute(&self, endpoint: &str, request: reqwest::RequestBuilder) -> AppResult<Bytes> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            tracing::warn!(endpoint, status = status.as_u16(), "Document service rejected request");
            return Err(status_error(status, &text));
        }

        tracing::debug!(endpoint, status = status.as_u16(), bytes = body.len(), "Request succeeded");
        Ok(body)
    }

    /// Check that the service accepts the configured credentials.
    pub async fn check_access(&self) -> AppResult<()> {
        let request = self.request(Method::GET, ACCESS_CHECK_ENDPOINT);
        self.execute(ACCESS_CHECK_ENDPOINT, request).await?;
        Ok(())
    }

    /// Upload a package as a new document, reporting progress while sending.
    pub async fn create_document(
        &self,
        package: &Package,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> AppResult<CreateDocumentResponse> {
        use base64::Engine;

        let request = CreateDocumentRequest {
            category_no: self.category_no,
            streams: vec![StreamInfo {
                file_name: &package.file_name,
                file_data_base64_json: base64::engine::general_purpose::STANDARD
                    .encode(&package.data),
            }],
            index_data: Vec::new(),
        };
        let payload = Bytes::from(serde_json::to_vec(&request)?);
        let total = payload.len() as u64;

        progress.begin(total);
        let body = progress_body(payload, self.chunk_size, progress.clone(), cancel.clone());
        let request = self
            .request(Method::POST, "CreateDocument")
            .header(CONTENT_LENGTH, total)
            .body(body);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::cancelled()),
            result = self.execute("CreateDocument", request) => result,
        };

        let body = match result {
            Err(_) if cancel.is_cancelled() => return Err(AppError::cancelled()),
            other => other?,
        };
        parse_create_document(&body)
    }

    /// Create a public read-only link to a document.
    pub async fn create_shared_link(
        &self,
        document_no: DocumentNo,
        password: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        filename: &str,
    ) -> AppResult<SharedLink> {
        let request = CreateSharedLinkRequest {
            doc_no: document_no.get(),
            password,
            expire: expires_at.map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            permission_type: PERMISSION_READ_ONLY,
            share_type: SHARE_TYPE_PUBLIC,
            file_format: FILE_FORMAT_ORIGINAL,
            filename,
        };
        let body = self.post_json("CreateSharedLink", &request).await?;
        let response: CreateSharedLinkResponse = serde_json::from_slice(&body).map_err(|e| {
            AppError::serialization(format!("failed to parse create shared link response: {e}"))
        })?;
        Ok(response.shared_link)
    }

    /// List links created by the current user.
    pub async fn shared_links_by_me(&self) -> AppResult<Vec<SharedLinkViewEntry>> {
        let body = self
            .post_json("GetSharedLinksSharedByMe", &SharedLinksQuery { query_id: 0 })
            .await?;
        let response: SharedLinksResponse = serde_json::from_slice(&body).map_err(|e| {
            AppError::serialization(format!("failed to parse shared links response: {e}"))
        })?;
        Ok(response.shared_link_view_entries)
    }

    /// Revoke a shared link.
    pub async fn revoke_shared_link(&self, link_id: &LinkId) -> AppResult<()> {
        self.post_json(
            "RevokeSharedLink",
            &RevokeSharedLinkRequest {
                link_id: link_id.as_str(),
            },
        )
        .await?;
        Ok(())
    }

    /// Delete a document.
    pub async fn delete_document(&self, document_no: DocumentNo) -> AppResult<()> {
        self.post_json(
            "DeleteDocument",
            &DeleteDocumentRequest {
                doc_no: document_no.get(),
            },
        )
        .await?;
        Ok(())
    }
}

/// Map a non-success status to an application error.
pub fn status_error(status: StatusCode, body: &str) -> AppError {
    match status.as_u16() {
        401 => AppError::unauthorized(
            "authentication failed - please check your credentials in settings",
        ),
        403 => AppError::remote_rejection(
            "permission denied - you don't have rights to perform this action. \
             Check your permissions for this category",
        ),
        404 => AppError::remote_rejection(
            "resource not found - the category or document may have been deleted",
        ),
        500 | 502 | 503 => AppError::transport(
            "document service error - please try again later or contact your administrator",
        ),
        code => AppError::remote_rejection(format!("API error (status {code}): {}", body.trim())),
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("request to {endpoint} timed out")
    } else if err.is_connect() {
        format!("could not connect to the document service: {err}")
    } else {
        format!("request to {endpoint} failed: {err}")
    };
    AppError::with_source(ErrorKind::Transport, message, err)
}
