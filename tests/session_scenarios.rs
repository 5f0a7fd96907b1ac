//! End-to-end session scenarios against a mock digitization service

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use signato::application::ports::{Camera, CameraError, DisplayStore, VideoStream};
use signato::application::{
    CameraManager, DroppedFile, ImageSource, SignatureSession, SubmissionOutcome,
};
use signato::domain::camera::{FacingMode, RawFrame};
use signato::domain::session::SessionPhase;
use signato::domain::signature::InkColor;
use signato::infrastructure::{HttpDigitizer, TempDirDisplayStore, UnavailableCamera};

const BLACK_RESULT: &[u8] = b"\x89PNG-black-result";
const BLUE_RESULT: &[u8] = b"\x89PNG-blue-result";

/// Camera that serves a fixed 2x1 frame
struct StillCamera;

struct StillStream {
    facing: FacingMode,
    active: Arc<AtomicBool>,
}

impl VideoStream for StillStream {
    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn snapshot(&self) -> Result<RawFrame, CameraError> {
        RawFrame::from_rgb(2, 1, vec![255, 0, 0, 0, 0, 255])
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for StillCamera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CameraError> {
        Ok(Box::new(StillStream {
            facing,
            active: Arc::new(AtomicBool::new(true)),
        }))
    }
}

fn session<C: Camera>(
    server: &MockServer,
    camera: C,
) -> SignatureSession<HttpDigitizer, C, TempDirDisplayStore> {
    SignatureSession::new(
        HttpDigitizer::new(&server.uri(), Duration::from_secs(5)),
        CameraManager::new(camera, FacingMode::Environment, true),
        TempDirDisplayStore::new().unwrap(),
        InkColor::Black,
    )
}

async fn mount_color_results(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/digitize"))
        .and(body_string_contains("black"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(BLACK_RESULT.to_vec()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/digitize"))
        .and(body_string_contains("blue"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(BLUE_RESULT.to_vec()))
        .mount(server)
        .await;
}

fn signature_drop() -> ImageSource {
    ImageSource::FromDrop(vec![
        DroppedFile::new("signature.png", b"fake-signature".to_vec()),
        DroppedFile::new("ignored.png", b"second file".to_vec()),
    ])
}

#[tokio::test]
async fn dropped_file_digitized_and_exported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/digitize"))
        .and(body_string_contains("blue"))
        .and(body_string_contains("filename=\"signature.png\""))
        .and(body_string_contains("fake-signature"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(BLUE_RESULT.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server, StillCamera);
    assert!(session.set_color(InkColor::Blue).await.is_none());
    assert!(session.acquire(signature_drop()).await.unwrap());
    assert_eq!(session.phase().await, SessionPhase::Previewing);

    let outcome = session.digitize().await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Completed(_)));
    assert_eq!(session.phase().await, SessionPhase::Result);

    let out = TempDir::new().unwrap();
    let exported = session.export(out.path()).await.unwrap();
    assert_eq!(exported, out.path().join("digitized_signature.png"));
    assert_eq!(std::fs::read(exported).unwrap(), BLUE_RESULT);

    // Preview and result
    assert_eq!(session.store().live_count(), 2);
}

#[tokio::test]
async fn service_rejection_becomes_session_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/digitize"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({ "error": "unsupported format" })),
        )
        .mount(&server)
        .await;

    let session = session(&server, StillCamera);
    session.acquire(signature_drop()).await.unwrap();

    let outcome = session.digitize().await.unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed("unsupported format".to_string())
    );

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Error);
    assert_eq!(snapshot.error.as_deref(), Some("unsupported format"));
    assert!(snapshot.can_digitize());
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn color_change_after_result_resubmits() {
    let server = MockServer::start().await;
    mount_color_results(&server).await;

    let session = session(&server, StillCamera);
    session.acquire(signature_drop()).await.unwrap();
    session.digitize().await.unwrap();

    let ticket = session
        .set_color(InkColor::Blue)
        .await
        .expect("image present, color changed");
    assert_eq!(session.phase().await, SessionPhase::Processing);
    assert!(matches!(
        session.run_submission(ticket).await,
        SubmissionOutcome::Completed(_)
    ));

    let out = TempDir::new().unwrap();
    let exported = session.export(&out.path().join("sig.png")).await.unwrap();
    assert_eq!(std::fs::read(exported).unwrap(), BLUE_RESULT);
    // Old result released when the resubmission started
    assert_eq!(session.store().live_count(), 2);
}

#[tokio::test]
async fn camera_capture_feeds_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/digitize"))
        .and(body_string_contains("filename=\"camera_capture.png\""))
        .and(body_string_contains("image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(BLACK_RESULT.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server, StillCamera);
    session.open_camera(Some(FacingMode::User)).await.unwrap();
    assert!(session.camera().is_open());
    assert_eq!(session.toggle_facing().await.unwrap(), FacingMode::Environment);

    session.capture().await.unwrap();
    assert!(!session.camera().is_open());
    assert!(!session.camera().has_active_stream());

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Previewing);
    assert_eq!(snapshot.image_name.as_deref(), Some("camera_capture.png"));

    assert!(matches!(
        session.digitize().await.unwrap(),
        SubmissionOutcome::Completed(_)
    ));
}

#[tokio::test]
async fn camera_permission_denied() {
    let server = MockServer::start().await;
    let session = session(&server, UnavailableCamera::new("Permission denied"));

    let err = session.open_camera(None).await.unwrap_err();
    assert_eq!(err.to_string(), "Unable to access camera: Permission denied");

    let snapshot = session.snapshot().await;
    assert!(!snapshot.camera_open);
    assert_eq!(snapshot.phase, SessionPhase::Error);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Unable to access camera: Permission denied")
    );
    assert!(!session.camera().has_active_stream());
}

#[tokio::test]
async fn digitize_without_image_is_rejected() {
    let server = MockServer::start().await;
    let session = session(&server, StillCamera);

    assert!(session.digitize().await.is_err());
    assert_eq!(session.phase().await, SessionPhase::Idle);
    assert!(session.export(std::path::Path::new(".")).await.is_err());
}

#[tokio::test]
async fn reset_releases_every_handle() {
    let server = MockServer::start().await;
    mount_color_results(&server).await;

    let session = session(&server, StillCamera);
    session.acquire(signature_drop()).await.unwrap();
    session.digitize().await.unwrap();
    assert_eq!(session.store().live_count(), 2);

    session.reset().await;
    assert_eq!(session.store().live_count(), 0);
    assert_eq!(session.phase().await, SessionPhase::Idle);
}
