//! Built-in step handlers.

pub mod access;
pub mod dependencies;
pub mod docker;
pub mod quality;
pub mod repository;
pub mod scaffold;
pub mod webserver;

pub use access::AccessRight;
pub use dependencies::InstallDependencies;
pub use docker::{DockerfileService, EnvFileApplication, EnvFileCreate};
pub use quality::PhpQuality;
pub use repository::{FolderProjectCreate, GitClone, GitIgnoreCreate};
pub use scaffold::{
    ComposerInit, LaravelCreate, NestCreate, NextCreate, NpmInit, ReactCreate, SymfonyCreate,
};
pub use webserver::{NginxWebserver, WebserverConfiguration, WebserverStrategy};

use crate::core::steps::{StepEngine, StepEngineBuilder};

pub const PRIORITY_GITIGNORE: i32 = 10;
pub const PRIORITY_REPOSITORY: i32 = 20;
pub const PRIORITY_CREATE: i32 = 30;
pub const PRIORITY_PACKAGE_INIT: i32 = 40;
pub const PRIORITY_DOCKERFILE: i32 = 50;
pub const PRIORITY_ENV_FILE: i32 = 60;
pub const PRIORITY_ACCESS_RIGHT: i32 = 70;
pub const PRIORITY_WEBSERVER: i32 = 80;
pub const PRIORITY_QUALITY: i32 = 90;
pub const PRIORITY_APPLICATION_ENV: i32 = 100;
pub const PRIORITY_INSTALL_DEPENDENCIES: i32 = 10;

/// Register every built-in handler. `GitClone` is registered before
/// `FolderProjectCreate` so a clone targets a folder that does not exist yet.
pub fn register_defaults(builder: &mut StepEngineBuilder) -> &mut StepEngineBuilder {
    builder
        .register(GitIgnoreCreate)
        .register(GitClone)
        .register(FolderProjectCreate)
        .register(SymfonyCreate)
        .register(LaravelCreate)
        .register(NextCreate)
        .register(NestCreate)
        .register(ReactCreate)
        .register(ComposerInit)
        .register(NpmInit)
        .register(DockerfileService)
        .register(EnvFileCreate)
        .register(AccessRight)
        .register(WebserverConfiguration::default())
        .register(PhpQuality)
        .register(EnvFileApplication)
        .register(InstallDependencies)
}

pub fn default_engine() -> StepEngine {
    let mut builder = StepEngine::builder();
    register_defaults(&mut builder);
    builder.build()
}
