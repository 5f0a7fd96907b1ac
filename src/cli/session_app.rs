//! Interactive session runner
//!
//! Reads commands line by line and drives a `SignatureSession`. Submissions
//! and camera opens run on spawned tasks so the loop keeps reading commands
//! (and `cancel` or Ctrl-C can reach a pending camera open); their results
//! come back as `SessionEvent`s.

use std::future::Future;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ports::{Camera, Digitizer, DisplayStore};
use crate::application::{
    DroppedFile, ImageSource, SessionError, SignatureSession, SubmissionOutcome,
};
use crate::domain::camera::FacingMode;
use crate::domain::session::SubmissionTicket;
use crate::domain::signature::{is_image_path, InkColor};
use crate::infrastructure::CameraSettings;

use super::app::{build_session, EXIT_ERROR, EXIT_SUCCESS};
use super::args::SessionOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

const HELP: &str = "\
Commands:
  open <path>              load an image file
  drop <path>...           hand files over as a drop (first file is used)
  camera [user|environment] open the camera
  flip                     switch between user and environment camera
  capture                  take a picture and close the camera
  cancel                   close the camera
  color <black|blue>       set the ink color (re-digitizes when an image is loaded)
  digitize                 send the image to the digitization service
  export [path]            save the result (default: digitized_signature.png)
  status                   show the session state
  reset                    discard image and result
  help                     show this help
  quit                     end the session";

/// A parsed interactive command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Open(PathBuf),
    Drop(Vec<PathBuf>),
    Camera(Option<FacingMode>),
    Flip,
    Capture,
    Cancel,
    Color(InkColor),
    Digitize,
    Export(Option<PathBuf>),
    Status,
    Reset,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_lowercase().as_str(), args.as_slice()) {
        ("open", [path]) => SessionCommand::Open(PathBuf::from(path)),
        ("open", _) => return Err("Usage: open <path>".to_string()),
        ("drop", paths) => SessionCommand::Drop(paths.iter().map(PathBuf::from).collect()),
        ("camera", []) => SessionCommand::Camera(None),
        ("camera", [facing]) => {
            let facing = facing.parse::<FacingMode>().map_err(|e| e.to_string())?;
            SessionCommand::Camera(Some(facing))
        }
        ("flip", []) => SessionCommand::Flip,
        ("capture", []) => SessionCommand::Capture,
        ("cancel", []) => SessionCommand::Cancel,
        ("color", [color]) => {
            SessionCommand::Color(color.parse::<InkColor>().map_err(|e| e.to_string())?)
        }
        ("color", _) => return Err("Usage: color <black|blue>".to_string()),
        ("digitize", []) => SessionCommand::Digitize,
        ("export", []) => SessionCommand::Export(None),
        ("export", [path]) => SessionCommand::Export(Some(PathBuf::from(path))),
        ("status", []) => SessionCommand::Status,
        ("reset", []) => SessionCommand::Reset,
        ("help" | "?", _) => SessionCommand::Help,
        ("quit" | "exit", []) => SessionCommand::Quit,
        (other, _) => {
            return Err(format!(
                "Unknown command or arguments: {} (type 'help')",
                other
            ))
        }
    };
    Ok(Some(command))
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Result of work the runner spawned
#[derive(Debug)]
pub enum SessionEvent {
    Submission(SubmissionOutcome),
    CameraOpened(Result<(), SessionError>),
    CameraFlipped(Result<FacingMode, SessionError>),
}

/// Drives a shared session from parsed commands
pub struct SessionRunner<D, C, S>
where
    D: Digitizer + 'static,
    C: Camera + 'static,
    S: DisplayStore + 'static,
{
    session: Arc<SignatureSession<D, C, S>>,
    presenter: Presenter,
    output_dir: PathBuf,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<D, C, S> SessionRunner<D, C, S>
where
    D: Digitizer + 'static,
    C: Camera + 'static,
    S: DisplayStore + 'static,
{
    /// Create a runner. Results of spawned work are sent to the returned
    /// receiver.
    pub fn new(
        session: Arc<SignatureSession<D, C, S>>,
        output_dir: PathBuf,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                session,
                presenter: Presenter::new(),
                output_dir,
                events,
            },
            receiver,
        )
    }

    pub fn session(&self) -> &Arc<SignatureSession<D, C, S>> {
        &self.session
    }

    /// Run one command
    pub async fn execute(&self, command: SessionCommand) -> Flow {
        let session = &self.session;
        let presenter = &self.presenter;

        match command {
            SessionCommand::Open(path) => {
                if !is_image_path(&path) {
                    presenter.warn(&format!("Not an image file: {}", path.display()));
                    return Flow::Continue;
                }
                match session.acquire(ImageSource::FromPicker(path)).await {
                    Ok(_) => self.report_image().await,
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            SessionCommand::Drop(paths) => {
                let mut files = Vec::with_capacity(paths.len());
                for path in &paths {
                    match DroppedFile::read(path).await {
                        Ok(file) => files.push(file),
                        Err(e) => {
                            presenter.error(&e.to_string());
                            return Flow::Continue;
                        }
                    }
                }
                match session.acquire(ImageSource::FromDrop(files)).await {
                    Ok(true) => self.report_image().await,
                    Ok(false) => presenter.info("Nothing dropped"),
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            SessionCommand::Camera(facing) => {
                presenter.info("Opening camera... ('cancel' to abort)");
                self.spawn_event(move |session| async move {
                    SessionEvent::CameraOpened(session.open_camera(facing).await)
                });
            }
            SessionCommand::Flip => {
                self.spawn_event(|session| async move {
                    SessionEvent::CameraFlipped(session.toggle_facing().await)
                });
            }
            SessionCommand::Capture => match session.capture().await {
                Ok(()) => self.report_image().await,
                Err(e) => presenter.error(&e.to_string()),
            },
            SessionCommand::Cancel => {
                if session.close_camera() {
                    presenter.info("Camera closed");
                }
            }
            SessionCommand::Color(color) => match session.set_color(color).await {
                Some(ticket) => {
                    presenter.info(&format!("Re-digitizing with {} ink...", color));
                    self.spawn_submission(ticket);
                }
                None => presenter.info(&format!("Ink color: {} ({})", color, color.label())),
            },
            SessionCommand::Digitize => match session.begin_digitize().await {
                Ok(ticket) => {
                    presenter.info(&format!("Digitizing ({} ink)...", ticket.color));
                    self.spawn_submission(ticket);
                }
                Err(e) => presenter.warn(&e.to_string()),
            },
            SessionCommand::Export(path) => {
                let destination = path.unwrap_or_else(|| self.output_dir.clone());
                match session.export(&destination).await {
                    Ok(path) => presenter.success(&format!("Saved {}", path.display())),
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            SessionCommand::Status => presenter.status(&session.snapshot().await),
            SessionCommand::Reset => {
                session.reset().await;
                presenter.info("Session reset");
            }
            SessionCommand::Help => presenter.output(HELP),
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Print the result of spawned work
    pub fn report_event(&self, event: &SessionEvent) {
        let presenter = &self.presenter;
        let camera = self.session.camera();
        match event {
            SessionEvent::Submission(SubmissionOutcome::Completed(handle)) => {
                presenter.success(&format!(
                    "Digitized: {} (use 'export' to save)",
                    handle.location().display()
                ))
            }
            SessionEvent::Submission(SubmissionOutcome::Failed(message)) => {
                presenter.error(message)
            }
            SessionEvent::Submission(SubmissionOutcome::Superseded) => {
                debug!("superseded submission finished")
            }
            SessionEvent::CameraOpened(Ok(())) if camera.has_active_stream() => {
                presenter.success(&format!(
                    "Camera open ({}). Use 'capture', 'flip' or 'cancel'.",
                    camera.facing()
                ))
            }
            SessionEvent::CameraOpened(Ok(())) => debug!("camera request superseded"),
            SessionEvent::CameraFlipped(Ok(facing)) => {
                presenter.info(&format!("Camera: {}", facing))
            }
            SessionEvent::CameraOpened(Err(e)) => presenter.error(&e.to_string()),
            SessionEvent::CameraFlipped(Err(e)) => presenter.error(&e.to_string()),
        }
    }

    async fn report_image(&self) {
        let snapshot = self.session.snapshot().await;
        if let (Some(name), Some(size)) = (snapshot.image_name, snapshot.image_size) {
            self.presenter
                .success(&format!("Loaded {} ({}). Ready to digitize.", name, size));
        }
    }

    fn spawn_submission(&self, ticket: SubmissionTicket) {
        self.spawn_event(move |session| async move {
            SessionEvent::Submission(session.run_submission(ticket).await)
        });
    }

    /// Run `work` on its own task and send its event back to the loop
    fn spawn_event<F, Fut>(&self, work: F)
    where
        F: FnOnce(Arc<SignatureSession<D, C, S>>) -> Fut,
        Fut: Future<Output = SessionEvent> + Send + 'static,
    {
        let events = self.events.clone();
        let task = work(Arc::clone(&self.session));
        tokio::spawn(async move {
            let _ = events.send(task.await);
        });
    }

    /// Main loop: commands from `lines`, results from `events`, until
    /// quit, end of input or shutdown. The session is reset on the way out.
    pub async fn run(
        &self,
        mut lines: mpsc::Receiver<String>,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
        shutdown: &ShutdownSignal,
    ) {
        loop {
            self.presenter.prompt();
            tokio::select! {
                _ = shutdown.wait() => {
                    debug!("shutdown requested");
                    break;
                }
                Some(event) = events.recv() => self.report_event(&event),
                line = lines.recv() => {
                    let Some(line) = line else {
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            if self.execute(command).await == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(message) => self.presenter.warn(&message),
                    }
                }
            }
        }
        self.session.reset().await;
    }
}

/// Forward stdin lines to a channel from a dedicated thread
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the interactive session on stdin
pub async fn run_session(options: SessionOptions, camera: CameraSettings) -> ExitCode {
    let presenter = Presenter::new();

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
        Ok(session) => Arc::new(session),
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.info(&format!(
        "Signato session ({}). Type 'help' for commands.",
        options.service.server_url
    ));

    let (runner, events) = SessionRunner::new(session, options.output_dir);
    runner.run(spawn_stdin_reader(), events, &shutdown).await;

    ExitCode::from(EXIT_SUCCESS)
}
