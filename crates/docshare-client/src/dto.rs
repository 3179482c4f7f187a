//! Wire shapes of the document service REST endpoints.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentNo, LinkId, ShareHistoryEntry};

/// Link permission: read only.
pub const PERMISSION_READ_ONLY: i32 = 1;
/// Link audience: anyone with the URL.
pub const SHARE_TYPE_PUBLIC: i32 = 2;
/// Download format: the original file.
pub const FILE_FORMAT_ORIGINAL: i32 = 1;

/// `CreateDocument` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDocumentRequest<'a> {
    /// Target category.
    pub category_no: i64,
    /// File streams attached to the document.
    pub streams: Vec<StreamInfo<'a>>,
    /// Index fields. Shares never set any, but the service expects the array.
    pub index_data: Vec<serde_json::Value>,
}

/// One file stream of a new document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamInfo<'a> {
    /// File name stored with the stream.
    pub file_name: &'a str,
    /// Base64 of the file content.
    #[serde(rename = "FileDataBase64JSON")]
    pub file_data_base64_json: String,
}

/// `CreateDocument` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateDocumentResponse {
    /// Number of the new document.
    pub doc_no: i64,
    /// Version number of the new document.
    pub version_no: i32,
    /// Last change time, service format.
    pub last_change_time: String,
    /// Last change time, ISO 8601.
    #[serde(rename = "LastChangeTimeISO8601")]
    pub last_change_time_iso8601: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateDocumentEnvelope {
    create_document_result: CreateDocumentResponse,
}

/// Parse a `CreateDocument` response, flat or wrapped in `CreateDocumentResult`.
pub fn parse_create_document(body: &[u8]) -> AppResult<CreateDocumentResponse> {
    if let Ok(flat) = serde_json::from_slice::<CreateDocumentResponse>(body) {
        if flat.doc_no > 0 {
            return Ok(flat);
        }
    }

    let wrapped: CreateDocumentEnvelope = serde_json::from_slice(body).map_err(|e| {
        AppError::serialization(format!("failed to parse create document response: {e}"))
    })?;
    if wrapped.create_document_result.doc_no <= 0 {
        return Err(AppError::remote_rejection(
            "document service did not return a document number",
        ));
    }
    Ok(wrapped.create_document_result)
}

/// `CreateSharedLink` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSharedLinkRequest<'a> {
    /// Document to share.
    pub doc_no: i64,
    /// Link password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    /// Expiry instant, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
    /// Permission of link holders.
    pub permission_type: i32,
    /// Audience of the link.
    pub share_type: i32,
    /// Download format.
    pub file_format: i32,
    /// File name offered for download.
    pub filename: &'a str,
}

/// A created link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SharedLink {
    /// Link identifier.
    #[serde(rename = "LinkID")]
    pub link_id: String,
    /// Link number.
    pub shared_link_no: i64,
    /// Public URL.
    pub link_url: String,
}

/// `CreateSharedLink` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSharedLinkResponse {
    /// The created link.
    pub shared_link: SharedLink,
}

/// `GetSharedLinksSharedByMe` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedLinksQuery {
    /// Continuation id; `0` starts a new query.
    pub query_id: i64,
}

/// `GetSharedLinksSharedByMe` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SharedLinksResponse {
    /// Whether the listing is complete.
    pub finished: bool,
    /// Continuation id.
    pub query_id: i64,
    /// Listed links.
    pub shared_link_view_entries: Vec<SharedLinkViewEntry>,
}

/// One listed link with its document context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SharedLinkViewEntry {
    /// Category of the document.
    pub category_name: String,
    /// Title of the document.
    pub document_title: String,
    /// Link details.
    pub shared_link: SharedLinkInfo,
}

/// Link details as listed by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SharedLinkInfo {
    /// Creation time.
    pub created_at: String,
    /// Display name of the creator.
    pub created_by_user_display: String,
    /// Linked document.
    pub doc_no: i64,
    /// Expiry time, empty when the link never expires.
    pub expires_at: String,
    /// Download file name.
    pub filename: String,
    /// Link identifier.
    pub link_id: String,
    /// Public URL.
    pub link_url: String,
    /// Whether a password is required.
    pub is_password_protected: bool,
}

impl From<SharedLinkViewEntry> for ShareHistoryEntry {
    fn from(entry: SharedLinkViewEntry) -> Self {
        let link = entry.shared_link;
        Self {
            filename: link.filename,
            url: link.link_url,
            link_id: LinkId::new(link.link_id),
            document_no: DocumentNo(link.doc_no),
            created_at: parse_timestamp(&link.created_at),
            expires_at: parse_timestamp(&link.expires_at),
            has_password: link.is_password_protected,
            category_name: entry.category_name,
        }
    }
}

/// `RevokeSharedLink` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevokeSharedLinkRequest<'a> {
    /// Link to revoke.
    pub link_id: &'a str,
}

/// `DeleteDocument` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDocumentRequest {
    /// Document to delete.
    pub doc_no: i64,
}

/// Parse a service timestamp; RFC 3339 or a zone-less ISO form taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
