#![allow(clippy::result_large_err)]

use super::{step_failures, Launcher, LifecycleReport, Operation};
use crate::core::docker::{compose, docker};
use crate::core::error::AppError;
use crate::core::model::{final_tag_name, Project, ProjectContainer};
use crate::core::process::run_checked;
use crate::core::types::{DockerAction, ErrorCategory};
use crate::core::workspace::ProjectPaths;
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Options of a start run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Wait for every project container to report running before returning.
    pub wait: bool,
    /// Readiness deadline; the configured one when `None`.
    pub timeout: Option<Duration>,
}

impl Launcher {
    /// Bring up service containers, then project containers with their START steps.
    pub async fn start(
        &self,
        client: &str,
        project: &str,
        options: StartOptions,
    ) -> Result<LifecycleReport, AppError> {
        let project = self.load_project(client, project)?;
        let paths = self.paths(&project);
        paths.require_root()?;

        let mut report = LifecycleReport::new(Operation::Start);
        report.total = project.containers.len();

        for service in project.service_containers() {
            let name = service.docker_service_name.as_str();
            let request = compose(&project, paths.root(), ["up", "--detach", name])
                .with_label(format!("[{}] docker compose up", name));
            match run_checked(self.runner(), &request).await {
                Ok(_) => report.success(name),
                Err(err) => report.failure(name, &err),
            }
        }

        let timeout = options.timeout.unwrap_or(self.config.readiness.timeout);
        for container in project.project_containers() {
            let name = container.docker_service_name.as_str();
            match self.start_container(&project, container, &paths, options.wait, timeout).await {
                Ok(()) => report.success(name),
                Err(err) => {
                    tracing::error!(service = name, error = %err, "start failed");
                    report.failure(name, &err);
                }
            }
        }

        self.publish_summary(&project, &report);
        Ok(report)
    }

    async fn start_container(
        &self,
        project: &Project,
        container: &ProjectContainer,
        paths: &ProjectPaths,
        wait: bool,
        timeout: Duration,
    ) -> Result<(), AppError> {
        let name = container.docker_service_name.as_str();
        let env_file = paths.env_file(&container.folder_name);
        if !env_file.is_file() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!("{} is missing, run generate first", env_file.display()),
            )
            .with_code("LIFE-002")
            .with_context("service", name));
        }

        let tag = final_tag_name(project, container);
        let lookup = docker(paths.root(), ["images", "-q", tag.as_str()]).quiet();
        let image = self.runner().run(&lookup).await?;
        if !image.success() || image.stdout_text().trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!("image {} does not exist, run build first", tag),
            )
            .with_code("LIFE-003")
            .with_context("service", name));
        }

        let request = compose(project, paths.root(), ["up", "--detach", name])
            .with_label(format!("[{}] docker compose up", name));
        run_checked(self.runner(), &request).await?;

        let steps = self.run_steps(project, container, paths, DockerAction::Start).await?;
        if let Some(error) = step_failures(&steps) {
            return Err(AppError::new(ErrorCategory::ProcessExecutionError, error)
                .with_code("LIFE-005")
                .with_context("service", name));
        }

        if wait {
            self.wait_for_service_to_be_ready(project, paths.root(), name, timeout)
                .await?;
        }
        Ok(())
    }

    /// Poll `docker compose ps` until the service answers or `timeout` elapses.
    pub async fn wait_for_service_to_be_ready(
        &self,
        project: &Project,
        root: &Path,
        service: &str,
        timeout: Duration,
    ) -> Result<(), AppError> {
        let started = Instant::now();
        let interval = self.config.readiness.interval;
        let mut attempts = 0u32;

        while started.elapsed() < timeout {
            attempts += 1;
            let status = compose(project, root, ["ps", "--format", "json", service]).quiet();
            let output = self.runner().run(&status).await?;
            if output.success() {
                tracing::info!(service, attempts, "service is ready");
                return Ok(());
            }
            tracing::debug!(service, attempts, exit_code = output.exit_code, "service not ready yet");
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            sleep(interval.min(remaining)).await;
        }

        Err(AppError::new(
            ErrorCategory::ReadinessTimeoutError,
            format!(
                "service '{}' was not ready after {}",
                service,
                humantime::format_duration(timeout)
            ),
        )
        .with_code("READY-001")
        .with_context("service", service)
        .with_context("attempts", attempts.to_string()))
    }
}
