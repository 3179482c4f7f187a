//! Share session tests: controller, transport, and REST binding together
//! against the mock document service.

mod helpers;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use docshare_client::ServiceClient;
use docshare_core::error::ErrorKind;
use docshare_core::types::{Expiry, PendingFile, Progress, ShareOptions};
use docshare_session::{Affordances, SessionObserver, SessionState, ShareController};

use helpers::{MockDocumentService, MockReply, TEST_LINK_URL, memory_file};

#[derive(Debug, Default)]
struct Timeline {
    states: Vec<&'static str>,
    progress: Vec<Progress>,
    locks: Vec<bool>,
}

struct TimelineObserver(Arc<Mutex<Timeline>>);

impl SessionObserver for TimelineObserver {
    fn state_changed(&mut self, state: &SessionState, _affordances: Affordances) {
        let mut timeline = self.0.lock().unwrap();
        timeline.states.push(state.name());
        if let SessionState::Uploading(progress) = state {
            timeline.progress.push(*progress);
        }
    }

    fn controls_locked(&mut self, locked: bool) {
        self.0.lock().unwrap().locks.push(locked);
    }
}

fn controller(mock: &MockDocumentService) -> ShareController {
    let client = ServiceClient::from_config(&mock.config()).unwrap();
    ShareController::new(Arc::new(client))
}

fn observed(mock: &MockDocumentService) -> (ShareController, Arc<Mutex<Timeline>>) {
    let timeline = Arc::new(Mutex::new(Timeline::default()));
    let controller =
        controller(mock).with_observer(Box::new(TimelineObserver(timeline.clone())));
    (controller, timeline)
}

#[tokio::test]
async fn test_share_two_files_completes_and_clears_selection() {
    let mock = MockDocumentService::start().await;
    let (mut controller, timeline) = observed(&mock);

    assert!(controller.add_file(memory_file("a.txt", 100)).unwrap());
    assert!(controller.add_file(memory_file("b.txt", 200)).unwrap());
    assert_eq!(controller.selection().total_size(), 300);

    controller
        .request(ShareOptions::new(Some(String::new()), Expiry::Never))
        .unwrap();

    match controller.run_until_settled().await {
        SessionState::Completed(receipt) => {
            assert_eq!(receipt.url, TEST_LINK_URL);
            assert_eq!(receipt.document_no.get(), 101);
            assert!(receipt.expires_at.is_none());
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(controller.selection().is_empty());
    assert!(!controller.is_locked());

    let link = mock.only_request("CreateSharedLink");
    assert_eq!(link.body["DocNo"], 101);
    assert_eq!(link.body["PermissionType"], 1);
    assert_eq!(link.body["ShareType"], 2);
    assert_eq!(link.body["FileFormat"], 1);
    assert!(link.body.get("Password").is_none());
    assert!(link.body.get("Expire").is_none());

    let filename = link.body["Filename"].as_str().unwrap();
    assert!(filename.starts_with("Archive-"), "{filename}");
    assert!(filename.ends_with(".zip"), "{filename}");
    assert_eq!(filename.len(), "Archive-yymmdd-hhmm.zip".len());

    let timeline = timeline.lock().unwrap();
    assert_eq!(timeline.states.first(), Some(&"preparing"));
    assert_eq!(timeline.states.last(), Some(&"completed"));
    assert_eq!(timeline.locks, vec![true, false]);

    let percents: Vec<u8> = timeline.progress.iter().map(|p| p.percent).collect();
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
    assert_eq!(percents.last(), Some(&100));
}

#[tokio::test]
async fn test_request_without_files_is_rejected_locally() {
    let mock = MockDocumentService::start().await;
    let mut controller = controller(&mock);

    let err = controller.request(ShareOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoFiles);
    assert!(matches!(controller.state(), SessionState::Idle));
    assert!(controller.selection().is_empty());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_cancel_mid_upload_keeps_selection() {
    let mock = MockDocumentService::start().await;
    mock.reply(
        "CreateDocument",
        MockReply::Held(json!({ "DocNo": 101, "VersionNo": 1 })),
    );
    let mut controller = controller(&mock);
    controller.add_file(memory_file("a.txt", 100)).unwrap();
    controller.add_file(memory_file("b.txt", 200)).unwrap();

    controller.request(ShareOptions::default()).unwrap();
    mock.wait_for("CreateDocument").await;

    assert!(controller.state().is_in_flight());
    assert!(controller.cancel());

    assert!(matches!(
        controller.run_until_settled().await,
        SessionState::Cancelled
    ));
    assert_eq!(controller.selection().len(), 2);
    assert!(!controller.is_locked());
    assert_eq!(mock.requests_to("CreateSharedLink").count(), 0);

    // A second cancel has nothing left to stop.
    assert!(!controller.cancel());
    mock.release();
}

#[tokio::test]
async fn test_cancel_during_body_keeps_selection() {
    let mock = MockDocumentService::start().await;
    mock.reply("CreateDocument", MockReply::Stalled);
    let mut config = mock.config();
    config.upload.chunk_size_bytes = 64 * 1024;
    let timeline = Arc::new(Mutex::new(Timeline::default()));
    let client = ServiceClient::from_config(&config).unwrap();
    let mut controller = ShareController::new(Arc::new(client))
        .with_observer(Box::new(TimelineObserver(timeline.clone())));
    controller
        .add_file(memory_file("large.bin", 16 * 1024 * 1024))
        .unwrap();

    controller.request(ShareOptions::default()).unwrap();
    mock.wait_for("CreateDocument").await;
    assert!(controller.cancel());

    assert!(matches!(
        controller.run_until_settled().await,
        SessionState::Cancelled
    ));
    assert_eq!(controller.selection().len(), 1);
    assert_eq!(mock.requests_to("CreateSharedLink").count(), 0);

    let timeline = timeline.lock().unwrap();
    assert_eq!(timeline.states.last(), Some(&"cancelled"));
    assert!(timeline.progress.iter().all(|p| p.percent < 100));
    drop(timeline);
    mock.release();
}

#[tokio::test]
async fn test_unresolvable_expiry_never_reaches_the_service() {
    let mock = MockDocumentService::start().await;
    let mut controller = controller(&mock);
    controller.add_file(memory_file("a.txt", 100)).unwrap();

    let err = controller
        .request(ShareOptions::new(None, Expiry::days(99_999_999)))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(matches!(controller.state(), SessionState::Idle));
    assert_eq!(controller.selection().len(), 1);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_single_flight_while_uploading() {
    let mock = MockDocumentService::start().await;
    mock.reply(
        "CreateDocument",
        MockReply::Held(json!({ "DocNo": 101, "VersionNo": 1 })),
    );
    let mut controller = controller(&mock);
    controller.add_file(memory_file("a.txt", 100)).unwrap();

    controller.request(ShareOptions::default()).unwrap();
    let busy = controller.request(ShareOptions::default()).unwrap_err();
    assert_eq!(busy.kind, ErrorKind::SessionBusy);

    let locked = controller.add_file(memory_file("b.txt", 10)).unwrap_err();
    assert_eq!(locked.kind, ErrorKind::SessionBusy);
    assert!(!controller.affordances().share_enabled);
    assert!(!controller.affordances().selection_editable);

    mock.wait_for("CreateDocument").await;
    mock.release();

    assert!(matches!(
        controller.run_until_settled().await,
        SessionState::Completed(_)
    ));
    assert_eq!(mock.requests_to("CreateDocument").count(), 1);
}

#[tokio::test]
async fn test_remote_rejection_keeps_selection_until_acknowledged() {
    let mock = MockDocumentService::start().await;
    mock.fail(
        "CreateDocument",
        axum::http::StatusCode::FORBIDDEN,
        "no rights",
    );
    let mut controller = controller(&mock);
    controller.add_file(memory_file("a.txt", 100)).unwrap();

    controller.request(ShareOptions::default()).unwrap();
    match controller.run_until_settled().await {
        SessionState::Failed(err) => {
            assert_eq!(err.kind, ErrorKind::RemoteRejection);
            assert!(err.message.contains("permission denied"));
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(controller.selection().len(), 1);
    assert!(!controller.affordances().share_enabled);

    assert!(controller.acknowledge());
    assert!(matches!(controller.state(), SessionState::Idle));
    assert!(controller.affordances().share_enabled);
}

#[tokio::test]
async fn test_unauthorized_link_creation_fails_session() {
    let mock = MockDocumentService::start().await;
    mock.fail(
        "CreateSharedLink",
        axum::http::StatusCode::UNAUTHORIZED,
        "",
    );
    let mut controller = controller(&mock);
    controller.add_file(memory_file("report.pdf", 50)).unwrap();

    controller.request(ShareOptions::default()).unwrap();
    match controller.run_until_settled().await {
        SessionState::Failed(err) => assert_eq!(err.kind, ErrorKind::Unauthorized),
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(mock.requests_to("CreateDocument").count(), 1);
}

#[tokio::test]
async fn test_password_and_day_expiry_reach_the_link() {
    let mock = MockDocumentService::start().await;
    let mut controller = controller(&mock);
    controller.add_file(memory_file("report.pdf", 50)).unwrap();

    let before = Utc::now();
    controller
        .request(ShareOptions::new(Some("s3cret".to_string()), Expiry::days(7)))
        .unwrap();

    let expires_at = match controller.run_until_settled().await {
        SessionState::Completed(receipt) => receipt.expires_at.unwrap(),
        other => panic!("unexpected state: {other:?}"),
    };
    assert!(expires_at >= before + Duration::days(7) - Duration::seconds(1));
    assert!(expires_at <= Utc::now() + Duration::days(7));

    let link = mock.only_request("CreateSharedLink");
    assert_eq!(link.body["Password"], "s3cret");
    assert_eq!(link.body["Filename"], "report.zip");
    let expire = link.body["Expire"].as_str().unwrap();
    let sent: DateTime<Utc> = DateTime::parse_from_rfc3339(expire).unwrap().into();
    assert_eq!(sent.timestamp(), expires_at.timestamp());
}

#[tokio::test]
async fn test_single_zip_is_uploaded_as_is() {
    let mock = MockDocumentService::start().await;
    let mut controller = controller(&mock);
    controller
        .add_file(PendingFile::in_memory("bundle.zip", b"PK\x05\x06".to_vec()))
        .unwrap();

    controller.request(ShareOptions::default()).unwrap();
    assert!(matches!(
        controller.run_until_settled().await,
        SessionState::Completed(_)
    ));

    let upload = mock.only_request("CreateDocument");
    assert_eq!(upload.body["Streams"][0]["FileName"], "bundle.zip");
    assert_eq!(mock.only_request("CreateSharedLink").body["Filename"], "bundle.zip");
}

#[tokio::test]
async fn test_add_path_rejects_missing_and_directory() {
    let mock = MockDocumentService::start().await;
    let mut controller = controller(&mock);
    let dir = tempfile::tempdir().unwrap();

    let missing = controller
        .add_path(dir.path().join("missing.txt"))
        .await
        .unwrap_err();
    assert_eq!(missing.kind, ErrorKind::Validation);

    let directory = controller.add_path(dir.path()).await.unwrap_err();
    assert_eq!(directory.kind, ErrorKind::Validation);

    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"hello").unwrap();
    assert!(controller.add_path(&file).await.unwrap());
    assert!(!controller.add_path(&file).await.unwrap());
    assert_eq!(controller.selection().len(), 1);
    assert_eq!(controller.selection().total_size(), 5);
}
