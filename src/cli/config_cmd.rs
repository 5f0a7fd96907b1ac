//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::camera::FacingMode;
use crate::domain::config::{AppConfig, CameraConfig};
use crate::domain::error::ConfigError;
use crate::domain::signature::InkColor;
use crate::domain::RequestTimeout;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config).await?;

    let stored = config_value(&config, key).unwrap_or_else(|| value.to_string());
    presenter.success(&format!("{} = {}", key, stored));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Validate `value` for `key` and store its normalised form
pub fn apply_config_value(
    config: &mut AppConfig,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "server_url" => {
            let url = value.trim().trim_end_matches('/');
            let host = url
                .strip_prefix("http://")
                .or_else(|| url.strip_prefix("https://"));
            if host.map_or(true, str::is_empty) {
                return Err(invalid(
                    "Value must be an http:// or https:// URL".to_string(),
                ));
            }
            config.server_url = Some(url.to_string());
        }
        "color" => {
            let color: InkColor = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.color = Some(color.to_string());
        }
        "facing" => {
            let facing: FacingMode = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.facing = Some(facing.to_string());
        }
        "timeout" => {
            let timeout: RequestTimeout = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.timeout = Some(timeout.to_string());
        }
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.output_dir = Some(value.to_string());
        }
        "camera.user_device" => {
            camera_mut(config).user_device = Some(parse_u32(value).ok_or_else(not_a_number(key))?);
        }
        "camera.environment_device" => {
            camera_mut(config).environment_device =
                Some(parse_u32(value).ok_or_else(not_a_number(key))?);
        }
        "camera.width" | "camera.height" => {
            let size = parse_u32(value)
                .filter(|size| *size > 0)
                .ok_or_else(|| invalid("Value must be a positive integer".to_string()))?;
            let camera = camera_mut(config);
            if key == "camera.width" {
                camera.width = Some(size);
            } else {
                camera.height = Some(size);
            }
        }
        "camera.mirror" => {
            camera_mut(config).mirror = Some(
                parse_bool(value)
                    .ok_or_else(|| invalid("Value must be 'true' or 'false'".to_string()))?,
            );
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

/// Current value of `key` as displayed by `get` and `list`
pub fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    let camera = config.camera.as_ref();
    match key {
        "server_url" => config.server_url.clone(),
        "color" => config.color.clone(),
        "facing" => config.facing.clone(),
        "timeout" => config.timeout.clone(),
        "output_dir" => config.output_dir.clone(),
        "camera.user_device" => camera.and_then(|c| c.user_device).map(|v| v.to_string()),
        "camera.environment_device" => camera
            .and_then(|c| c.environment_device)
            .map(|v| v.to_string()),
        "camera.mirror" => camera.and_then(|c| c.mirror).map(|v| v.to_string()),
        "camera.width" => camera.and_then(|c| c.width).map(|v| v.to_string()),
        "camera.height" => camera.and_then(|c| c.height).map(|v| v.to_string()),
        _ => None,
    }
}

fn camera_mut(config: &mut AppConfig) -> &mut CameraConfig {
    config.camera.get_or_insert_with(CameraConfig::default)
}

fn not_a_number(key: &str) -> impl FnOnce() -> ConfigError + '_ {
    move || ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a non-negative integer".to_string(),
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
