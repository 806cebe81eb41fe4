//! Builders for the docker commands issued by the engine.

use crate::core::model::{Project, ProjectKind};
use crate::core::process::ProcessRequest;
use crate::core::types::Environment;
use std::path::Path;

pub const COMPOSE_PROJECT_NAME: &str = "COMPOSE_PROJECT_NAME";

/// `docker compose <args>` run from the project root, isolated by `COMPOSE_PROJECT_NAME`.
pub fn compose<I, S>(project: &Project, root: &Path, args: I) -> ProcessRequest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args = std::iter::once("compose".to_string()).chain(args.into_iter().map(Into::into));
    ProcessRequest::new("docker", args)
        .in_dir(root)
        .with_env(COMPOSE_PROJECT_NAME, &project.compose_project_name())
}

/// Plain `docker <args>` run from `dir`.
pub fn docker<I, S>(dir: &Path, args: I) -> ProcessRequest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ProcessRequest::new("docker", args).in_dir(dir)
}

/// Run `command` in a throwaway container with `host_dir` mounted as its working directory.
pub fn run_ephemeral<I, S>(host_dir: &Path, image: &str, workdir: &str, command: I) -> ProcessRequest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{}", host_dir.display(), workdir),
        "-w".to_string(),
        workdir.to_string(),
        image.to_string(),
    ];
    args.extend(command.into_iter().map(Into::into));
    ProcessRequest::new("docker", args).in_dir(host_dir)
}

/// Tag of the shared base image of a runtime version.
pub fn socle_tag(kind: ProjectKind, version: &str, environment: Environment) -> String {
    format!("socle-{}-{}-{}", kind.slug(), version, environment)
}
