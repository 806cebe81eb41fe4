#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

pub const DEFAULT_COMPOSE_VERSION: &str = "3.7";
const MINIMUM_COMPOSE_VERSION: (u32, u32) = (2, 0);

/// Top-level network declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkDefinition {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl NetworkDefinition {
    pub fn external(name: &str) -> Self {
        Self {
            external: true,
            name: Some(name.to_string()),
            extra: IndexMap::new(),
        }
    }
}

/// Top-level named volume declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl VolumeDefinition {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            extra: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extends {
    pub file: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildContext {
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
}

/// One `services.<name>` stanza. Keys the engine does not manage are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceStanza {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environment: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Extends>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_file: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// In-memory compose document. Every transform consumes the value and returns the
/// updated one; keys are replaced, never merged, so re-applying a transform is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeDocument {
    pub version: String,
    #[serde(default)]
    pub networks: IndexMap<String, NetworkDefinition>,
    #[serde(default)]
    pub volumes: IndexMap<String, VolumeDefinition>,
    #[serde(default)]
    pub services: IndexMap<String, ServiceStanza>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for ComposeDocument {
    fn default() -> Self {
        Self {
            version: DEFAULT_COMPOSE_VERSION.to_string(),
            networks: IndexMap::new(),
            volumes: IndexMap::new(),
            services: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }
}

impl ComposeDocument {
    /// Load an existing document or create the minimal skeleton.
    pub fn initialize(existing: Option<&str>) -> Result<Self, AppError> {
        let Some(content) = existing.filter(|content| !content.trim().is_empty()) else {
            return Ok(Self::default());
        };

        let mut raw: Value = serde_yaml::from_str(content).map_err(|err| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                "compose document is not valid YAML",
                err,
            )
            .with_code("COMPOSE-002")
        })?;

        let mapping = raw.as_mapping_mut().ok_or_else(|| {
            AppError::new(
                ErrorCategory::ValidationError,
                "compose document must be a mapping",
            )
            .with_code("COMPOSE-002")
        })?;

        let version = match mapping.get("version") {
            Some(Value::String(version)) => version.clone(),
            Some(Value::Number(version)) => version.to_string(),
            _ => return Err(invalid_version("missing")),
        };
        validate_version(&version)?;
        mapping.insert(Value::from("version"), Value::from(version));
        for key in ["networks", "volumes", "services"] {
            if matches!(mapping.get(key), Some(Value::Null)) {
                mapping.remove(key);
            }
        }

        serde_yaml::from_value(raw).map_err(|err| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                "compose document does not match the expected schema",
                err,
            )
            .with_code("COMPOSE-003")
        })
    }

    pub fn to_yaml(&self) -> Result<String, AppError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn service_exists(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceStanza> {
        self.services.get(name)
    }

    pub fn add_docker_service(mut self, name: &str, stanza: ServiceStanza) -> Self {
        self.services.insert(name.to_string(), stanza);
        self
    }

    pub fn remove_docker_service(mut self, name: &str) -> Self {
        self.services.shift_remove(name);
        self
    }

    /// Add ports to a service, skipping ones it already exposes.
    pub fn expose_ports<I, S>(mut self, service: &str, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(stanza) = self.services.get_mut(service) {
            for port in ports {
                let port = port.into();
                if !stanza.ports.contains(&port) {
                    stanza.ports.push(port);
                }
            }
        }
        self
    }

    /// Attach a volume mount to a service, skipping duplicates.
    pub fn add_volume(mut self, service: &str, volume: &str) -> Self {
        if let Some(stanza) = self.services.get_mut(service) {
            if !stanza.volumes.iter().any(|existing| existing == volume) {
                stanza.volumes.push(volume.to_string());
            }
        }
        self
    }

    pub fn set_global_network_compose_data(
        mut self,
        name: &str,
        network: NetworkDefinition,
    ) -> Self {
        self.networks.insert(name.to_string(), network);
        self
    }

    pub fn set_global_volume_compose_data(mut self, name: &str, volume: VolumeDefinition) -> Self {
        self.volumes.insert(name.to_string(), volume);
        self
    }
}

fn invalid_version(found: &str) -> AppError {
    AppError::new(
        ErrorCategory::ValidationError,
        format!("compose version must be at least 2.0 (found {})", found),
    )
    .with_code("COMPOSE-001")
}

fn validate_version(version: &str) -> Result<(), AppError> {
    let mut parts = version.trim().split('.');
    let major = parts.next().and_then(|part| part.parse::<u32>().ok());
    let minor = match parts.next() {
        Some(part) => part.parse::<u32>().ok(),
        None => Some(0),
    };
    match (major, minor) {
        (Some(major), Some(minor)) if (major, minor) >= MINIMUM_COMPOSE_VERSION => Ok(()),
        _ => Err(invalid_version(version)),
    }
}
