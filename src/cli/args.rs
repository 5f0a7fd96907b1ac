//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::camera::FacingMode;
use crate::domain::signature::InkColor;
use crate::domain::RequestTimeout;

/// Signato - signature digitization from images and camera captures
#[derive(Parser, Debug)]
#[command(name = "signato")]
#[command(version)]
#[command(about = "Digitize handwritten signatures into transparent ink images")]
#[command(long_about = None)]
pub struct Cli {
    /// Base URL of the digitization service
    #[arg(short = 's', long, value_name = "URL", global = true, env = "SIGNATO_SERVER_URL")]
    pub server: Option<String>,

    /// Request timeout, 1s to 10m (e.g., 45s, 2m, 1m30s)
    #[arg(short = 't', long, value_name = "TIME", global = true)]
    pub timeout: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Digitize an image file and save the result
    Digitize(DigitizeArgs),
    /// Capture a frame from the camera, digitize it and save the result
    Capture(CaptureArgs),
    /// Interactive session (commands are read from stdin)
    Session(SessionArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct DigitizeArgs {
    /// Image file to digitize
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Ink color of the result
    #[arg(short = 'c', long, value_name = "COLOR")]
    pub color: Option<ColorArg>,

    /// Output file or directory (default: digitized_signature.png)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Camera to use
    #[arg(short = 'f', long, value_name = "FACING")]
    pub facing: Option<FacingArg>,

    /// Ink color of the result
    #[arg(short = 'c', long, value_name = "COLOR")]
    pub color: Option<ColorArg>,

    /// Output file or directory (default: digitized_signature.png)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep the sensor orientation instead of mirroring the capture
    #[arg(long)]
    pub no_mirror: bool,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Initial ink color
    #[arg(short = 'c', long, value_name = "COLOR")]
    pub color: Option<ColorArg>,

    /// Initial camera
    #[arg(short = 'f', long, value_name = "FACING")]
    pub facing: Option<FacingArg>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Ink color argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Black,
    Blue,
}

impl From<ColorArg> for InkColor {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Black => InkColor::Black,
            ColorArg::Blue => InkColor::Blue,
        }
    }
}

/// Facing mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FacingArg {
    User,
    Environment,
}

impl From<FacingArg> for FacingMode {
    fn from(arg: FacingArg) -> Self {
        match arg {
            FacingArg::User => FacingMode::User,
            FacingArg::Environment => FacingMode::Environment,
        }
    }
}

/// Settings shared by every command that talks to the service
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub server_url: String,
    pub timeout: RequestTimeout,
}

/// Parsed digitize options (one-shot file mode)
#[derive(Debug, Clone)]
pub struct DigitizeOptions {
    pub service: ServiceOptions,
    pub file: PathBuf,
    pub color: InkColor,
    pub output: PathBuf,
}

/// Parsed capture options (one-shot camera mode)
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub service: ServiceOptions,
    pub facing: FacingMode,
    pub color: InkColor,
    pub output: PathBuf,
    pub mirror: bool,
}

/// Parsed interactive session options
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub service: ServiceOptions,
    pub facing: FacingMode,
    pub color: InkColor,
    pub output_dir: PathBuf,
    pub mirror: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server_url",
    "color",
    "facing",
    "timeout",
    "output_dir",
    "camera.user_device",
    "camera.environment_device",
    "camera.mirror",
    "camera.width",
    "camera.height",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
