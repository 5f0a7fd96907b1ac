//! Main app runners for one-shot modes

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use crate::application::ports::{Camera, ConfigStore, Digitizer, DisplayError, DisplayStore};
use crate::application::{
    CameraManager, ImageSource, SessionError, SignatureSession, SubmissionOutcome,
};
use crate::domain::camera::FacingMode;
use crate::domain::config::AppConfig;
use crate::domain::signature::{is_image_path, InkColor};
use crate::infrastructure::{
    create_camera, CameraSettings, HttpDigitizer, PlatformCamera, TempDirDisplayStore,
    XdgConfigStore,
};

use super::args::{CaptureOptions, DigitizeOptions, ServiceOptions};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Time given to the sensor to settle exposure before a one-shot capture
const CAPTURE_WARMUP: StdDuration = StdDuration::from_millis(500);

/// Session wired to the real adapters
pub type CliSession = SignatureSession<HttpDigitizer, PlatformCamera, TempDirDisplayStore>;

/// Build a session against the configured service and platform camera
pub fn build_session(
    service: &ServiceOptions,
    camera: CameraSettings,
    facing: FacingMode,
    mirror: bool,
    color: InkColor,
) -> Result<CliSession, DisplayError> {
    let digitizer = HttpDigitizer::new(&service.server_url, service.timeout.as_std());
    let camera = CameraManager::new(create_camera(camera), facing, mirror);
    let store = TempDirDisplayStore::new()?;
    Ok(SignatureSession::new(digitizer, camera, store, color))
}

/// Digitize an image file and export the result
pub async fn run_digitize(options: DigitizeOptions, camera: CameraSettings) -> ExitCode {
    let mut presenter = Presenter::new();

    if !is_image_path(&options.file) {
        presenter.error(&format!(
            "Not an image file: {}",
            options.file.display()
        ));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let session = match build_session(
        &options.service,
        camera,
        FacingMode::default(),
        true,
        options.color,
    ) {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = session
        .acquire(ImageSource::FromPicker(options.file.clone()))
        .await
    {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    digitize_and_export(&session, &mut presenter, &shutdown, &options.output).await
}

/// Capture a camera frame, digitize it and export the result
pub async fn run_capture(options: CaptureOptions, camera: CameraSettings) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let session = match build_session(
        &options.service,
        camera,
        options.facing,
        options.mirror,
        options.color,
    ) {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.start_spinner(&format!("Opening {} camera...", options.facing));
    let captured = tokio::select! {
        result = capture_frame(&session) => result,
        _ = shutdown.wait() => {
            session.close_camera();
            presenter.spinner_fail("Cancelled");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = captured {
        presenter.spinner_fail(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.spinner_success("Captured frame");

    digitize_and_export(&session, &mut presenter, &shutdown, &options.output).await
}

async fn capture_frame<D, C, S>(session: &SignatureSession<D, C, S>) -> Result<(), SessionError>
where
    D: Digitizer,
    C: Camera,
    S: DisplayStore,
{
    session.open_camera(None).await?;
    tokio::time::sleep(CAPTURE_WARMUP).await;
    session.capture().await
}

/// Submit the acquired image and write the result to `output`
pub async fn digitize_and_export<D, C, S>(
    session: &SignatureSession<D, C, S>,
    presenter: &mut Presenter,
    shutdown: &ShutdownSignal,
    output: &Path,
) -> ExitCode
where
    D: Digitizer,
    C: Camera,
    S: DisplayStore,
{
    let color = session.snapshot().await.color;
    presenter.start_spinner(&format!("Digitizing ({} ink)...", color));

    let outcome = tokio::select! {
        outcome = session.digitize() => outcome,
        _ = shutdown.wait() => {
            presenter.spinner_fail("Cancelled");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match outcome {
        Ok(SubmissionOutcome::Completed(_)) => presenter.spinner_success("Digitized"),
        Ok(SubmissionOutcome::Failed(message)) => {
            presenter.spinner_fail(&message);
            return ExitCode::from(EXIT_ERROR);
        }
        Ok(SubmissionOutcome::Superseded) => {
            presenter.spinner_fail("Submission was superseded");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    match session.export(output).await {
        Ok(path) => {
            presenter.output(&path.display().to_string());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration from file and CLI.
/// Environment values arrive through the CLI layer.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    // Merge: defaults < file < env/cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
