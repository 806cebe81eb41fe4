#![allow(clippy::result_large_err)]

use super::{ConfigValidator, LauncherConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "launcher.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// `$HOME/.launcher/launcher.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".launcher").join(CONFIG_FILE_NAME))
    }

    /// Load with precedence defaults, config file, `LAUNCHER_*` environment, then validate.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<LauncherConfig, AppError> {
        let file_config = match explicit {
            Some(path) => Some(Self::load_from_file(path)?.ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("config file {} does not exist", path.display()),
                )
                .with_code("CONFIG-001")
            })?),
            None => match Self::default_config_path() {
                Some(path) => Self::load_from_file(&path)?,
                None => None,
            },
        };

        let mut config = file_config.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Returns Ok(None) if the file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<LauncherConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: LauncherConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_code("CONFIG-002")
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values; unparsable ones are ignored.
    fn apply_env_overrides(config: &mut LauncherConfig) {
        if let Ok(dir) = env::var("LAUNCHER_PROJECTS_DIR") {
            config.projects_dir = PathBuf::from(dir);
        }

        if let Ok(network) = env::var("LAUNCHER_TRAEFIK_NETWORK") {
            config.traefik_network = network;
        }

        if let Some(timeout) = duration_var("LAUNCHER_PROCESS_IDLE_TIMEOUT") {
            config.process.idle_timeout = timeout;
        }

        if let Some(timeout) = duration_var("LAUNCHER_READINESS_TIMEOUT") {
            config.readiness.timeout = timeout;
        }

        if let Some(interval) = duration_var("LAUNCHER_READINESS_INTERVAL") {
            config.readiness.interval = interval;
        }

        if let Ok(size) = env::var("LAUNCHER_EVENTS_QUEUE_SIZE") {
            match size.parse::<usize>() {
                Ok(size) => config.events.queue_size = size,
                Err(_) => tracing::warn!(value = %size, "ignoring invalid LAUNCHER_EVENTS_QUEUE_SIZE"),
            }
        }

        if let Ok(hub_url) = env::var("LAUNCHER_EVENTS_HUB_URL") {
            match Url::parse(&hub_url) {
                Ok(url) => config.events.hub_url = Some(url),
                Err(err) => tracing::warn!(value = %hub_url, error = %err, "ignoring invalid LAUNCHER_EVENTS_HUB_URL"),
            }
        }

        if let Ok(topic) = env::var("LAUNCHER_EVENTS_TOPIC") {
            config.events.topic = topic;
        }

        if let Ok(image) = env::var("LAUNCHER_IMAGES_COMPOSER") {
            config.images.composer = image;
        }

        if let Ok(image) = env::var("LAUNCHER_IMAGES_NODE_SCAFFOLD") {
            config.images.node_scaffold = image;
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "LAUNCHER_PROJECTS_DIR - Override the projects root directory (default: ~/launcher/projects)",
            "LAUNCHER_TRAEFIK_NETWORK - Override the reverse-proxy network name (default: traefik)",
            "LAUNCHER_PROCESS_IDLE_TIMEOUT - Override the process idle timeout (default: 60s)",
            "LAUNCHER_READINESS_TIMEOUT - Override the readiness poll timeout (default: 60s)",
            "LAUNCHER_READINESS_INTERVAL - Override the readiness poll interval (default: 5s)",
            "LAUNCHER_EVENTS_QUEUE_SIZE - Override the progress event queue capacity (default: 256)",
            "LAUNCHER_EVENTS_HUB_URL - Publish progress events to this HTTP endpoint",
            "LAUNCHER_EVENTS_TOPIC - Override the topic sent with published events (default: launcher)",
            "LAUNCHER_IMAGES_COMPOSER - Override the composer scaffolding image (default: composer:2)",
            "LAUNCHER_IMAGES_NODE_SCAFFOLD - Override the node scaffolding image (default: node:{version}-alpine)",
        ]
    }
}

fn duration_var(name: &str) -> Option<std::time::Duration> {
    let raw = env::var(name).ok()?;
    match humantime::parse_duration(&raw) {
        Ok(duration) => Some(duration),
        Err(err) => {
            tracing::warn!(variable = name, value = %raw, error = %err, "ignoring invalid duration override");
            None
        }
    }
}
