#![allow(clippy::result_large_err)]

use super::{Launcher, LifecycleReport, Operation};
use crate::core::docker::docker;
use crate::core::error::AppError;
use crate::core::model::final_tag_name;
use crate::core::process::run_checked;
use crate::core::types::ErrorCategory;

impl Launcher {
    /// Stop the project, remove its built images, then its directory.
    ///
    /// A failed stop or image removal is reported and deletion continues.
    pub async fn delete(&self, client: &str, project: &str) -> Result<LifecycleReport, AppError> {
        let project = self.load_project(client, project)?;
        let paths = self.paths(&project);
        paths.require_root()?;

        let mut report = LifecycleReport::new(Operation::Delete);
        report.total = project.project_containers().count();

        if let Err(err) = self.compose_down(&project, &paths).await {
            tracing::warn!(error = %err, "stop before delete failed");
            report.failure(&project.compose_project_name(), &err);
        }

        for container in project.project_containers() {
            let name = container.docker_service_name.as_str();
            let tag = final_tag_name(&project, container);
            let result = async {
                let lookup = docker(paths.root(), ["images", "-q", tag.as_str()]).quiet();
                let existing = self.runner().run(&lookup).await?;
                if existing.success() && !existing.stdout_text().trim().is_empty() {
                    let remove = docker(paths.root(), ["image", "rm", tag.as_str()])
                        .with_label(format!("removing image {}", tag));
                    run_checked(self.runner(), &remove).await?;
                }
                Ok::<(), AppError>(())
            }
            .await;
            match result {
                Ok(()) => report.success(name),
                Err(err) => report.failure(name, &err),
            }
        }

        std::fs::remove_dir_all(paths.root()).map_err(|err| {
            AppError::with_source(
                ErrorCategory::FilesystemError,
                format!("failed to remove {}", paths.root().display()),
                err,
            )
            .with_code("FS-005")
        })?;
        tracing::info!(client = %project.client, project = %project.project, "project directory removed");

        self.publish_summary(&project, &report);
        Ok(report)
    }
}
