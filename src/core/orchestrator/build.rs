#![allow(clippy::result_large_err)]

use super::{Launcher, LifecycleReport, Operation};
use crate::core::docker::{compose, docker, socle_tag};
use crate::core::error::AppError;
use crate::core::model::{Project, ProjectContainer};
use crate::core::process::run_checked;
use crate::core::types::ErrorCategory;
use crate::core::workspace::ProjectPaths;
use std::collections::HashSet;

impl Launcher {
    /// Build the images of the selected project containers, default all.
    ///
    /// Service containers run from published images and are skipped. The shared
    /// socle image of each runtime version is built once, only when missing.
    pub async fn build(
        &self,
        client: &str,
        project: &str,
        services: &[String],
    ) -> Result<LifecycleReport, AppError> {
        let project = self.load_project(client, project)?;
        let paths = self.paths(&project);
        paths.require_root()?;

        let selected = select_containers(&project, services)?;
        let mut report = LifecycleReport::new(Operation::Build);
        report.total = selected.len();

        let mut socles: HashSet<String> = HashSet::new();
        for container in selected {
            let service = container.docker_service_name.as_str();
            let result = async {
                self.ensure_socle(&project, container, &paths, &mut socles).await?;
                let request = compose(&project, paths.root(), ["build", service])
                    .with_label(format!("[{}] docker compose build", service));
                run_checked(self.runner(), &request).await?;
                Ok::<(), AppError>(())
            }
            .await;
            match result {
                Ok(()) => report.success(service),
                Err(err) => {
                    tracing::error!(service, error = %err, "build failed");
                    report.failure(service, &err);
                }
            }
        }

        self.publish_summary(&project, &report);
        Ok(report)
    }

    async fn ensure_socle(
        &self,
        project: &Project,
        container: &ProjectContainer,
        paths: &ProjectPaths,
        built: &mut HashSet<String>,
    ) -> Result<(), AppError> {
        let generator = self.services.generators.for_container(container)?;
        let variables = generator.generate_socle_env_variables(container, project)?;
        let version = crate::core::env::require_version(container)?;
        let tag = socle_tag(container.kind, version, project.environment);
        // Only successes are remembered; a failed socle is retried for the next container.
        if built.contains(&tag) {
            return Ok(());
        }

        let lookup = docker(paths.root(), ["images", "-q", tag.as_str()]).quiet();
        let existing = self.runner().run(&lookup).await?;
        if existing.success() && !existing.stdout_text().trim().is_empty() {
            tracing::debug!(%tag, "socle image already present");
            built.insert(tag);
            return Ok(());
        }

        let socle_dir = paths.socle_dir(container.kind);
        let mut args = vec!["build".to_string(), "-t".to_string(), tag.clone()];
        for (key, value) in &variables {
            args.push("--build-arg".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push("-f".to_string());
        args.push(paths.socle_dockerfile(container.kind).display().to_string());
        args.push(socle_dir.display().to_string());

        let request = docker(paths.root(), args).with_label(format!("building socle image {}", tag));
        run_checked(self.runner(), &request).await?;
        tracing::info!(%tag, "socle image built");
        built.insert(tag);
        Ok(())
    }
}

/// Project containers named in `services`, or all of them when empty.
fn select_containers<'a>(
    project: &'a Project,
    services: &[String],
) -> Result<Vec<&'a ProjectContainer>, AppError> {
    if services.is_empty() {
        return Ok(project.project_containers().collect());
    }
    let mut selected = Vec::new();
    for name in services {
        match project.find_container(name) {
            Some(container) => {
                if let Some(container) = container.as_project() {
                    selected.push(container);
                } else {
                    tracing::info!(service = %name, "service container runs from a published image, skipping build");
                }
            }
            None => {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!("service '{}' is not part of {}/{}", name, project.client, project.project),
                )
                .with_code("LIFE-004"))
            }
        }
    }
    Ok(selected)
}
