//! Signato CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use signato::cli::{
    app::{load_merged_config, run_capture, run_digitize, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{CaptureOptions, Cli, Commands, DigitizeOptions, ServiceOptions, SessionOptions},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
    session_app::run_session,
};
use signato::domain::camera::FacingMode;
use signato::domain::config::AppConfig;
use signato::domain::signature::InkColor;
use signato::domain::RequestTimeout;
use signato::infrastructure::{CameraSettings, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    if let Commands::Config { action } = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Per-command overrides
    let (color, facing) = match &cli.command {
        Commands::Digitize(args) => (args.color.map(InkColor::from), None),
        Commands::Capture(args) => (
            args.color.map(InkColor::from),
            args.facing.map(FacingMode::from),
        ),
        Commands::Session(args) => (
            args.color.map(InkColor::from),
            args.facing.map(FacingMode::from),
        ),
        Commands::Config { .. } => (None, None),
    };

    let cli_config = AppConfig {
        server_url: cli.server.clone(),
        color: color.map(|c| c.to_string()),
        facing: facing.map(|f| f.to_string()),
        timeout: cli.timeout.clone(),
        output_dir: None,
        camera: None,
    };

    let config = load_merged_config(cli_config).await;

    let timeout = match config.timeout.as_ref() {
        Some(s) => match s.parse::<RequestTimeout>() {
            Ok(timeout) => timeout,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => RequestTimeout::default(),
    };

    let service = ServiceOptions {
        server_url: config.server_url_or_default().to_string(),
        timeout,
    };
    let camera = CameraSettings::from_config(&config);
    let output_dir = PathBuf::from(config.output_dir.as_deref().unwrap_or("."));

    match cli.command {
        Commands::Digitize(args) => {
            let options = DigitizeOptions {
                service,
                file: args.file,
                color: config.color_or_default(),
                output: args.output.unwrap_or(output_dir),
            };
            run_digitize(options, camera).await
        }
        Commands::Capture(args) => {
            let options = CaptureOptions {
                service,
                facing: config.facing_or_default(),
                color: config.color_or_default(),
                output: args.output.unwrap_or(output_dir),
                mirror: config.mirror_or_default() && !args.no_mirror,
            };
            run_capture(options, camera).await
        }
        Commands::Session(_) => {
            let options = SessionOptions {
                service,
                facing: config.facing_or_default(),
                color: config.color_or_default(),
                output_dir,
                mirror: config.mirror_or_default(),
            };
            run_session(options, camera).await
        }
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}
