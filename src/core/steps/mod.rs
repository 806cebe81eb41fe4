#![allow(clippy::result_large_err)]

//! Atomic provisioning steps and the engine running them.

pub mod engine;
pub mod handlers;

pub use engine::{StepEngine, StepEngineBuilder, StepOutcome, StepRunReport};

use crate::core::config::ImagesConfig;
use crate::core::env::{EnvModifierChain, GeneratorRegistry};
use crate::core::error::AppError;
use crate::core::events::EventPublisher;
use crate::core::model::{Project, ProjectContainer};
use crate::core::process::ProcessRunner;
use crate::core::types::DockerAction;
use crate::core::workspace::ProjectPaths;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStep {
    InitGitignore,
    GitClone,
    InitFolderRepository,
    SymfonyCreate,
    LaravelCreate,
    NextCreate,
    NestCreate,
    ReactCreate,
    ComposerInit,
    NpmInit,
    Dockerfile,
    EnvFile,
    AccessRight,
    ConfigurationWebserver,
    PhpQuality,
    EnvFileApplication,
    InstallDependencies,
}

impl ApplicationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStep::InitGitignore => "INIT_GITIGNORE",
            ApplicationStep::GitClone => "GIT_CLONE",
            ApplicationStep::InitFolderRepository => "INIT_FOLDER_REPOSITORY",
            ApplicationStep::SymfonyCreate => "SYMFONY_CREATE",
            ApplicationStep::LaravelCreate => "LARAVEL_CREATE",
            ApplicationStep::NextCreate => "NEXT_CREATE",
            ApplicationStep::NestCreate => "NEST_CREATE",
            ApplicationStep::ReactCreate => "REACT_CREATE",
            ApplicationStep::ComposerInit => "COMPOSER_INIT",
            ApplicationStep::NpmInit => "NPM_INIT",
            ApplicationStep::Dockerfile => "DOCKERFILE",
            ApplicationStep::EnvFile => "ENV_FILE",
            ApplicationStep::AccessRight => "ACCESS_RIGHT",
            ApplicationStep::ConfigurationWebserver => "CONFIGURATION_WEBSERVER",
            ApplicationStep::PhpQuality => "PHP_QUALITY",
            ApplicationStep::EnvFileApplication => "ENV_FILE_APPLICATION",
            ApplicationStep::InstallDependencies => "INSTALL_DEPENDENCIES",
        }
    }
}

impl fmt::Display for ApplicationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collaborators shared by every handler of one engine.
#[derive(Clone)]
pub struct StepServices {
    pub runner: Arc<dyn ProcessRunner>,
    pub publisher: Arc<dyn EventPublisher>,
    pub generators: GeneratorRegistry,
    pub modifiers: Arc<EnvModifierChain>,
    pub images: ImagesConfig,
}

/// Container being provisioned, with its project and on-disk layout.
pub struct StepContext<'a> {
    pub project: &'a Project,
    pub container: &'a ProjectContainer,
    pub paths: &'a ProjectPaths,
    pub services: &'a StepServices,
}

impl StepContext<'_> {
    /// Directory holding the container's application sources.
    pub fn container_dir(&self) -> std::path::PathBuf {
        self.paths.container_dir(&self.container.folder_name)
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.services.runner.as_ref()
    }

    /// A repository is declared but no clone has produced the folder yet.
    pub fn awaits_clone(&self) -> bool {
        self.container.repository.is_some() && !self.container_dir().exists()
    }
}

/// One atomic provisioning action.
///
/// Handlers must be idempotent: running a step twice leaves the same files behind.
#[async_trait]
pub trait StepHandler: Send + Sync + 'static {
    fn step(&self) -> ApplicationStep;

    fn action(&self) -> DockerAction {
        DockerAction::Build
    }

    /// Lower runs first; ties keep registration order.
    fn priority(&self) -> i32;

    fn supports(&self, steps: &[ApplicationStep], action: DockerAction) -> bool {
        action == self.action() && steps.contains(&self.step())
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError>;
}
