use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

/// Launcher configuration loaded from `launcher.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Root of the `<client>/<project>` tree
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,

    /// Name of the external reverse-proxy network
    #[serde(default = "default_traefik_network")]
    pub traefik_network: String,

    #[serde(default)]
    pub process: ProcessConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

/// External process execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Kill a command producing no output for this long
    #[serde(default = "default_idle_timeout", with = "duration_str")]
    pub idle_timeout: Duration,
}

/// Readiness poll after `start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_readiness_timeout", with = "duration_str")]
    pub timeout: Duration,

    #[serde(default = "default_readiness_interval", with = "duration_str")]
    pub interval: Duration,
}

/// Progress event fan-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Capacity of the bounded event queue
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Hub endpoint receiving events over HTTP, disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_url: Option<Url>,

    #[serde(default = "default_topic")]
    pub topic: String,
}

/// Ephemeral images used to scaffold applications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_composer_image")]
    pub composer: String,

    /// Node image; `{version}` is replaced by the container's Node version
    #[serde(default = "default_node_scaffold_image")]
    pub node_scaffold: String,
}

impl ImagesConfig {
    pub fn node_image(&self, version: &str) -> String {
        self.node_scaffold.replace("{version}", version)
    }
}

fn default_projects_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("launcher")
        .join("projects")
}

fn default_traefik_network() -> String {
    "traefik".to_string()
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_readiness_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_readiness_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_queue_size() -> usize {
    256
}

fn default_topic() -> String {
    "launcher".to_string()
}

fn default_composer_image() -> String {
    "composer:2".to_string()
}

fn default_node_scaffold_image() -> String {
    "node:{version}-alpine".to_string()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            projects_dir: default_projects_dir(),
            traefik_network: default_traefik_network(),
            process: ProcessConfig::default(),
            readiness: ReadinessConfig::default(),
            events: EventsConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        ProcessConfig {
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        ReadinessConfig {
            timeout: default_readiness_timeout(),
            interval: default_readiness_interval(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        EventsConfig {
            queue_size: default_queue_size(),
            hub_url: None,
            topic: default_topic(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        ImagesConfig {
            composer: default_composer_image(),
            node_scaffold: default_node_scaffold_image(),
        }
    }
}

/// Durations written the human way (`"60s"`, `"1m 30s"`).
mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
