#![allow(clippy::result_large_err)]

//! Persistence of project descriptors as JSON documents.

use crate::core::error::AppError;
use crate::core::model::Project;
use crate::core::types::ErrorCategory;
use crate::utils::write_atomic;
use std::fs;
use std::path::{Path, PathBuf};

pub const DESCRIPTOR_FILE: &str = "project.json";

/// Source of project descriptors consumed by the lifecycle orchestrators.
pub trait EnvironmentStore: Send + Sync {
    fn load(&self, client: &str, project: &str) -> Result<Option<Project>, AppError>;
    fn save(&self, project: &Project) -> Result<(), AppError>;
    /// Root directory of the project tree on disk.
    fn project_dir(&self, client: &str, project: &str) -> PathBuf;
}

/// Stores each descriptor at `<root>/<client>/<project>/project.json`.
pub struct JsonEnvironmentStore {
    root: PathBuf,
}

impl JsonEnvironmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn descriptor_path(&self, client: &str, project: &str) -> PathBuf {
        self.project_dir(client, project).join(DESCRIPTOR_FILE)
    }

    /// Move a project under a new name and rewrite its descriptor.
    pub fn rename_project(
        &self,
        client: &str,
        project: &str,
        new_name: &str,
    ) -> Result<Project, AppError> {
        let mut descriptor = self.require(client, project)?;
        let source = self.project_dir(client, project);
        let target = self.project_dir(client, new_name);
        move_dir(&source, &target)?;

        descriptor.project = new_name.to_string();
        self.save(&descriptor)?;
        tracing::info!(client, from = project, to = new_name, "renamed project");
        Ok(descriptor)
    }

    /// Move every project of a client under a new client name.
    pub fn rename_client(&self, client: &str, new_client: &str) -> Result<Vec<Project>, AppError> {
        let source = self.root.join(client);
        let target = self.root.join(new_client);
        move_dir(&source, &target)?;

        let mut renamed = Vec::new();
        for entry in fs::read_dir(&target)?.flatten() {
            if !entry.path().join(DESCRIPTOR_FILE).exists() {
                continue;
            }
            let project_name = entry.file_name().to_string_lossy().to_string();
            if let Some(mut descriptor) = self.load(new_client, &project_name)? {
                descriptor.client = new_client.to_string();
                self.save(&descriptor)?;
                renamed.push(descriptor);
            }
        }
        tracing::info!(from = client, to = new_client, projects = renamed.len(), "renamed client");
        Ok(renamed)
    }

    /// Projects stored for a client, sorted by name.
    pub fn list(&self, client: &str) -> Result<Vec<String>, AppError> {
        let client_dir = self.root.join(client);
        if !client_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&client_dir)?
            .flatten()
            .filter(|entry| entry.path().join(DESCRIPTOR_FILE).exists())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn require(&self, client: &str, project: &str) -> Result<Project, AppError> {
        self.load(client, project)?.ok_or_else(|| {
            AppError::new(
                ErrorCategory::FilesystemError,
                format!("project {}/{} does not exist", client, project),
            )
            .with_code("STORE-003")
        })
    }
}

impl EnvironmentStore for JsonEnvironmentStore {
    fn load(&self, client: &str, project: &str) -> Result<Option<Project>, AppError> {
        let path = self.descriptor_path(client, project);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let descriptor: Project = serde_json::from_str(&content).map_err(|err| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                format!("failed to parse project descriptor {}", path.display()),
                err,
            )
            .with_code("STORE-001")
        })?;
        Ok(Some(descriptor))
    }

    fn save(&self, project: &Project) -> Result<(), AppError> {
        project.validate()?;
        let path = self.descriptor_path(&project.client, &project.project);
        let content = serde_json::to_vec_pretty(project)?;
        write_atomic(&path, &content)?;
        tracing::debug!(path = %path.display(), "saved project descriptor");
        Ok(())
    }

    fn project_dir(&self, client: &str, project: &str) -> PathBuf {
        self.root.join(client).join(project)
    }
}

fn move_dir(source: &Path, target: &Path) -> Result<(), AppError> {
    if !source.exists() {
        return Err(AppError::new(
            ErrorCategory::FilesystemError,
            format!("{} does not exist", source.display()),
        )
        .with_code("STORE-003"));
    }
    if target.exists() {
        return Err(AppError::new(
            ErrorCategory::FilesystemError,
            format!("{} already exists", target.display()),
        )
        .with_code("STORE-002"));
    }
    fs::rename(source, target).map_err(|err| {
        AppError::with_source(
            ErrorCategory::FilesystemError,
            format!("failed to move {} to {}", source.display(), target.display()),
            err,
        )
        .with_code("STORE-004")
    })
}
