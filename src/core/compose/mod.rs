//! Docker Compose document model and persistence.

pub mod document;
pub mod file;

pub use document::{
    BuildContext, ComposeDocument, Extends, NetworkDefinition, ServiceStanza, VolumeDefinition,
    DEFAULT_COMPOSE_VERSION,
};
pub use file::{ComposeFile, COMPOSE_FILE_NAME};
