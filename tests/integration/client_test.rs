//! REST binding tests against the mock document service.

mod helpers;

use axum::http::{Method, StatusCode};
use base64::Engine;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use docshare_client::ServiceClient;
use docshare_client::archive::Package;
use docshare_core::error::ErrorKind;
use docshare_core::traits::DocumentService;
use docshare_core::types::{
    DocumentNo, Expiry, LinkId, ProgressReporter, ProgressSignal, ShareOptions, ShareUpload,
};

use helpers::{
    MockDocumentService, MockReply, TEST_CATEGORY, TEST_TENANT, TEST_TOKEN, history_entry,
    memory_file,
};

fn client(mock: &MockDocumentService) -> ServiceClient {
    ServiceClient::from_config(&mock.config()).unwrap()
}

fn package(size: usize) -> Package {
    Package {
        file_name: "report.zip".to_string(),
        data: Bytes::from(vec![7u8; size]),
    }
}

#[tokio::test]
async fn test_check_access_sends_credentials() {
    let mock = MockDocumentService::start().await;
    client(&mock).check_access().await.unwrap();

    let request = mock.only_request("help/operations/GetSystemCustomerId");
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
    assert_eq!(request.tenant.as_deref(), Some(TEST_TENANT));
}

#[tokio::test]
async fn test_check_access_unauthorized() {
    let mock = MockDocumentService::start().await;
    mock.fail(
        "help/operations/GetSystemCustomerId",
        StatusCode::UNAUTHORIZED,
        "bad token",
    );

    let err = client(&mock).check_access().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(err.message.contains("check your credentials"));
}

#[tokio::test]
async fn test_create_document_uploads_base64_and_reports_progress() {
    let mock = MockDocumentService::start().await;
    let (progress, mut signals) = ProgressReporter::channel();
    let package = package(1000);

    let created = client(&mock)
        .create_document(&package, &progress, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(created.doc_no, 101);

    let request = mock.only_request("CreateDocument");
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.body["CategoryNo"], TEST_CATEGORY);
    assert_eq!(request.body["Streams"][0]["FileName"], "report.zip");
    assert_eq!(request.body["IndexData"], serde_json::json!([]));
    let encoded = request.body["Streams"][0]["FileDataBase64JSON"]
        .as_str()
        .unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(decoded, package.data.to_vec());

    let total = match signals.try_recv().unwrap() {
        ProgressSignal::Started { bytes_total } => bytes_total,
        other => panic!("unexpected signal: {other:?}"),
    };
    assert_eq!(request.content_length, Some(total));

    let mut last = None;
    while let Ok(ProgressSignal::Advanced(p)) = signals.try_recv() {
        if let Some(previous) = last {
            assert!(p.percent > previous, "percent went from {previous} to {}", p.percent);
        }
        last = Some(p.percent);
    }
    assert_eq!(last, Some(100));
    assert_eq!(progress.bytes_sent(), total);
}

#[tokio::test]
async fn test_create_document_wrapped_response() {
    let mock = MockDocumentService::start().await;
    mock.reply(
        "CreateDocument",
        MockReply::Json(
            StatusCode::OK,
            serde_json::json!({ "CreateDocumentResult": { "DocNo": 55 } }),
        ),
    );

    let created = client(&mock)
        .create_document(&package(10), &ProgressReporter::detached(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(created.doc_no, 55);
}

#[tokio::test]
async fn test_create_document_cancelled_before_send() {
    let mock = MockDocumentService::start().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client(&mock)
        .create_document(&package(10), &ProgressReporter::detached(), &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_create_shared_link_request_fields() {
    let mock = MockDocumentService::start().await;
    let expires_at = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();

    let link = client(&mock)
        .create_shared_link(DocumentNo(101), Some("pw"), Some(expires_at), "report.zip")
        .await
        .unwrap();
    assert_eq!(link.link_id, "abc");
    assert_eq!(link.link_url, helpers::TEST_LINK_URL);

    let request = mock.only_request("CreateSharedLink");
    assert_eq!(request.body["DocNo"], 101);
    assert_eq!(request.body["Password"], "pw");
    assert_eq!(request.body["Expire"], "2026-12-31T00:00:00Z");
    assert_eq!(request.body["PermissionType"], 1);
    assert_eq!(request.body["ShareType"], 2);
    assert_eq!(request.body["FileFormat"], 1);
    assert_eq!(request.body["Filename"], "report.zip");
}

#[tokio::test]
async fn test_status_mapping() {
    let mock = MockDocumentService::start().await;
    let client = client(&mock);
    let cases = [
        (StatusCode::FORBIDDEN, ErrorKind::RemoteRejection),
        (StatusCode::NOT_FOUND, ErrorKind::RemoteRejection),
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Transport),
        (StatusCode::SERVICE_UNAVAILABLE, ErrorKind::Transport),
    ];

    for (status, kind) in cases {
        mock.fail("DeleteDocument", status, "");
        let err = client.delete_document(DocumentNo(1)).await.unwrap_err();
        assert_eq!(err.kind, kind, "status {status}");
    }

    mock.fail("DeleteDocument", StatusCode::BAD_REQUEST, "document is locked");
    let err = client.delete_document(DocumentNo(1)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RemoteRejection);
    assert_eq!(err.message, "API error (status 400): document is locked");
}

#[tokio::test]
async fn test_shared_links_by_me() {
    let mock = MockDocumentService::start().await;
    mock.seed_history(vec![
        history_entry("l1", 1, "a.zip"),
        history_entry("l2", 2, "b.zip"),
    ]);

    let entries = client(&mock).shared_links_by_me().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].shared_link.link_id, "l2");
    assert_eq!(entries[1].shared_link.doc_no, 2);
}

#[tokio::test]
async fn test_revoke_and_delete_bodies() {
    let mock = MockDocumentService::start().await;
    let client = client(&mock);

    client.revoke_shared_link(&LinkId::new("l1")).await.unwrap();
    client.delete_document(DocumentNo(9)).await.unwrap();

    assert_eq!(mock.only_request("RevokeSharedLink").body["LinkId"], "l1");
    assert_eq!(mock.only_request("DeleteDocument").body["DocNo"], 9);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mock = MockDocumentService::start().await;
    let mut config = mock.config();
    config.remote.base_url = format!("http://{addr}");

    let err = ServiceClient::from_config(&config)
        .unwrap()
        .check_access()
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
}

#[tokio::test]
async fn test_cancel_while_body_is_streaming() {
    let mock = MockDocumentService::start().await;
    mock.reply("CreateDocument", MockReply::Stalled);
    let mut config = mock.config();
    config.upload.chunk_size_bytes = 64 * 1024;
    let client = ServiceClient::from_config(&config).unwrap();

    let (progress, mut signals) = ProgressReporter::channel();
    let cancel = CancellationToken::new();
    let upload = {
        let progress = progress.clone();
        let cancel = cancel.clone();
        let package = package(16 * 1024 * 1024);
        tokio::spawn(async move { client.create_document(&package, &progress, &cancel).await })
    };

    mock.wait_for("CreateDocument").await;
    cancel.cancel();

    let err = upload.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());

    let total = match signals.try_recv().unwrap() {
        ProgressSignal::Started { bytes_total } => bytes_total,
        other => panic!("unexpected signal: {other:?}"),
    };
    assert!(progress.bytes_sent() < total);
    mock.release();
}

#[tokio::test]
async fn test_share_rejects_unresolvable_expiry_before_upload() {
    let mock = MockDocumentService::start().await;
    let upload = ShareUpload {
        files: vec![memory_file("a.txt", 10)],
        options: ShareOptions::new(None, Expiry::days(99_999_999)),
    };

    let err = client(&mock)
        .share_files(upload, ProgressReporter::detached(), CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(mock.requests().is_empty());
}
