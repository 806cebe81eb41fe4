#![allow(clippy::result_large_err)]

//! On-disk layout of a generated project.

use crate::core::compose::COMPOSE_FILE_NAME;
use crate::core::env::APPLICATION_ENV_FILE;
use crate::core::error::AppError;
use crate::core::model::ProjectKind;
use crate::core::registrar::BASE_COMPOSE_FILE;
use crate::core::types::ErrorCategory;
use std::path::{Path, PathBuf};

/// Paths below one `<projects_dir>/<client>/<project>` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE_NAME)
    }

    pub fn base_compose_file(&self) -> PathBuf {
        self.root.join(BASE_COMPOSE_FILE)
    }

    pub fn docker_dir(&self) -> PathBuf {
        self.root.join("docker")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    pub fn makefile(&self) -> PathBuf {
        self.root.join("Makefile")
    }

    /// Application sources of a container.
    pub fn container_dir(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    pub fn container_docker_dir(&self, folder: &str) -> PathBuf {
        self.docker_dir().join(folder)
    }

    pub fn env_file(&self, folder: &str) -> PathBuf {
        self.container_docker_dir(folder).join(".env")
    }

    pub fn dockerfile(&self, folder: &str) -> PathBuf {
        self.container_docker_dir(folder).join("Dockerfile")
    }

    pub fn application_env_file(&self, folder: &str) -> PathBuf {
        self.container_dir(folder).join(APPLICATION_ENV_FILE)
    }

    pub fn socle_dir(&self, kind: ProjectKind) -> PathBuf {
        self.docker_dir().join("socle").join(kind.slug())
    }

    pub fn socle_dockerfile(&self, kind: ProjectKind) -> PathBuf {
        self.socle_dir(kind).join("Dockerfile")
    }

    pub fn nginx_conf_dir(&self, nginx_folder: &str) -> PathBuf {
        self.container_docker_dir(nginx_folder).join("conf.d")
    }

    /// Fail unless the project directory exists.
    pub fn require_root(&self) -> Result<(), AppError> {
        validate_path(&self.root)
    }
}

pub fn validate_path(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Err(AppError::new(
            ErrorCategory::FilesystemError,
            format!("Path not found: {}", path.display()),
        )
        .with_code("FS-004"));
    }

    if !path.is_dir() {
        return Err(AppError::new(
            ErrorCategory::FilesystemError,
            format!("Path is not a directory: {}", path.display()),
        )
        .with_code("FS-004"));
    }

    Ok(())
}
