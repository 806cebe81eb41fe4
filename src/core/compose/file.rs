#![allow(clippy::result_large_err)]

use crate::core::compose::document::ComposeDocument;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::utils::files::write_atomic;
use std::path::{Path, PathBuf};

pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Compose document bound to its location on disk.
#[derive(Debug, Clone)]
pub struct ComposeFile {
    path: PathBuf,
}

impl ComposeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Compose file at the root of a project directory.
    pub fn in_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join(COMPOSE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the document, or the skeleton when the file does not exist yet.
    pub fn load(&self) -> Result<ComposeDocument, AppError> {
        if !self.exists() {
            return ComposeDocument::initialize(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|err| {
            AppError::with_source(
                ErrorCategory::FilesystemError,
                format!("failed to read {}", self.path.display()),
                err,
            )
            .with_code("COMPOSE-004")
        })?;
        ComposeDocument::initialize(Some(&content))
            .map_err(|err| err.with_context("path", self.path.display().to_string()))
    }

    /// Serialize and replace the file atomically.
    pub fn save(&self, document: &ComposeDocument) -> Result<(), AppError> {
        let yaml = document.to_yaml()?;
        write_atomic(&self.path, yaml.as_bytes())?;
        tracing::debug!(path = %self.path.display(), services = document.services.len(), "compose file saved");
        Ok(())
    }
}
