#![allow(clippy::result_large_err)]

use super::{manifest, step_failures, Launcher, LifecycleReport, Operation};
use crate::core::compose::{ComposeFile, NetworkDefinition};
use crate::core::error::AppError;
use crate::core::events::{EventKind, ProgressEvent};
use crate::core::model::{Container, Project, ProjectKind};
use crate::core::registrar::TRAEFIK_NETWORK_KEY;
use crate::core::template::{socle_dockerfile, BASE_COMPOSE};
use crate::core::types::DockerAction;
use crate::core::workspace::ProjectPaths;
use crate::utils::{ensure_dir, write_atomic};
use std::collections::BTreeSet;

impl Launcher {
    /// Materialize the project tree, the compose file and every container's files.
    ///
    /// Registration and step failures are collected per container; filesystem
    /// failures on the shared tree abort the operation.
    pub async fn generate(&self, client: &str, project: &str) -> Result<LifecycleReport, AppError> {
        let project = self.load_project(client, project)?;
        project.validate()?;
        let paths = self.paths(&project);
        let mut report = LifecycleReport::new(Operation::Generate);
        report.total = project.containers.len();

        self.publish(
            ProgressEvent::info(format!(
                "generating {}/{} in {}",
                project.client,
                project.project,
                paths.root().display()
            ))
            .with_kind(EventKind::Log),
        );

        for dir in [paths.root().to_path_buf(), paths.logs_dir(), paths.bin_dir(), paths.docker_dir()] {
            ensure_dir(&dir)?;
        }
        write_shared_files(&project, &paths)?;

        let compose = ComposeFile::in_project(paths.root());
        let mut document = compose.load()?.set_global_network_compose_data(
            TRAEFIK_NETWORK_KEY,
            NetworkDefinition::external(&project.network),
        );

        let mut failed = BTreeSet::new();
        for container in &project.containers {
            match self.registrars.apply(document.clone(), container, &project) {
                Ok(updated) => document = updated,
                Err(err) => {
                    tracing::error!(
                        service = container.docker_service_name(),
                        error = %err,
                        "failed to register compose service"
                    );
                    failed.insert(container.docker_service_name().to_string());
                    report.failure(container.docker_service_name(), &err);
                }
            }
        }
        compose.save(&document)?;

        for container in project.project_containers() {
            let service = container.docker_service_name.as_str();
            if failed.contains(service) {
                continue;
            }
            match self.run_steps(&project, container, &paths, DockerAction::Build).await {
                Ok(steps) => match step_failures(&steps) {
                    Some(error) => {
                        failed.insert(service.to_string());
                        report.failure(service, error);
                    }
                    None => report.success(service),
                },
                Err(err) => {
                    failed.insert(service.to_string());
                    report.failure(service, &err);
                }
            }
        }
        for service in project.service_containers() {
            if !failed.contains(&service.docker_service_name) {
                report.success(&service.docker_service_name);
            }
        }

        write_atomic(&paths.makefile(), manifest::render_makefile(&project).as_bytes())?;
        self.store.save(&project)?;

        self.publish_summary(&project, &report);
        Ok(report)
    }
}

/// Base compose file and one socle Dockerfile per runtime used by the project.
fn write_shared_files(project: &Project, paths: &ProjectPaths) -> Result<(), AppError> {
    write_atomic(&paths.base_compose_file(), BASE_COMPOSE.as_bytes())?;

    let kinds: BTreeSet<&'static str> = project
        .containers
        .iter()
        .filter_map(Container::as_project)
        .map(|container| container.kind.slug())
        .collect();
    for kind in ProjectKind::ALL {
        if kinds.contains(kind.slug()) {
            write_atomic(&paths.socle_dockerfile(kind), socle_dockerfile(kind).as_bytes())?;
        }
    }
    Ok(())
}
