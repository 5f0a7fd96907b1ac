//! CLI presenter for output formatting

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::SessionSnapshot;
use crate::domain::session::SessionPhase;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    pub fn is_spinner_active(&self) -> bool {
        self.is_spinner_active.load(Ordering::SeqCst)
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (result paths, config values)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Interactive prompt on stdout, without newline
    pub fn prompt(&self) {
        print!("{} ", "signato>".bold());
        let _ = io::stdout().flush();
    }

    /// Print the session state
    pub fn status(&self, snapshot: &SessionSnapshot) {
        for (key, value) in format_status(snapshot) {
            self.key_value(key, &value);
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows shown by `status`; absent values are omitted
pub fn format_status(snapshot: &SessionSnapshot) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("phase", phase_label(snapshot.phase).to_string()),
        (
            "color",
            format!("{} ({})", snapshot.color, snapshot.color.label()),
        ),
        (
            "camera",
            format!(
                "{} ({})",
                if snapshot.camera_open { "open" } else { "closed" },
                snapshot.facing
            ),
        ),
    ];

    if let (Some(name), Some(size)) = (&snapshot.image_name, &snapshot.image_size) {
        rows.push(("image", format!("{} ({})", name, size)));
    }
    if let Some(preview) = &snapshot.preview {
        rows.push(("preview", preview.display().to_string()));
    }
    if let Some(result) = &snapshot.result {
        let size = snapshot.result_size.as_deref().unwrap_or("?");
        rows.push(("result", format!("{} ({})", result.display(), size)));
    }
    if let Some(error) = &snapshot.error {
        rows.push(("error", error.clone()));
    }
    rows
}

fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Idle => "idle (no image)",
        SessionPhase::Previewing => "previewing",
        SessionPhase::Processing => "processing",
        SessionPhase::Result => "result ready",
        SessionPhase::Error => "error",
    }
}
