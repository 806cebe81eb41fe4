#![allow(clippy::result_large_err)]

use super::{Launcher, LifecycleReport, Operation};
use crate::core::docker::compose;
use crate::core::error::AppError;
use crate::core::model::Project;
use crate::core::process::run_checked;
use crate::core::workspace::ProjectPaths;

impl Launcher {
    /// Stop and remove the project's containers. Named volumes are kept.
    pub async fn stop(&self, client: &str, project: &str) -> Result<LifecycleReport, AppError> {
        let project = self.load_project(client, project)?;
        let paths = self.paths(&project);
        paths.require_root()?;

        let mut report = LifecycleReport::new(Operation::Stop);
        report.total = 1;
        let label = project.compose_project_name();
        match self.compose_down(&project, &paths).await {
            Ok(()) => report.success(&label),
            Err(err) => report.failure(&label, &err),
        }

        self.publish_summary(&project, &report);
        Ok(report)
    }

    pub(super) async fn compose_down(
        &self,
        project: &Project,
        paths: &ProjectPaths,
    ) -> Result<(), AppError> {
        let request = compose(project, paths.root(), ["down", "--remove-orphans"])
            .with_label("docker compose down");
        run_checked(self.runner(), &request).await?;
        Ok(())
    }
}
