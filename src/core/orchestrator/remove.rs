#![allow(clippy::result_large_err)]

use super::{Launcher, LifecycleReport, Operation};
use crate::core::compose::ComposeFile;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

impl Launcher {
    /// Drop a container from the project and rewrite the compose file without it.
    ///
    /// Remaining containers are registered again so stanzas referring to the
    /// removed service (depends_on, nginx mounts) are refreshed. The reduced
    /// project is validated first; a rejected removal leaves both the descriptor
    /// and the compose file untouched.
    pub async fn remove_service(
        &self,
        client: &str,
        project: &str,
        service: &str,
    ) -> Result<LifecycleReport, AppError> {
        let mut project = self.load_project(client, project)?;
        let paths = self.paths(&project);

        if project.remove_container(service).is_none() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "service '{}' is not part of {}/{}",
                    service, project.client, project.project
                ),
            )
            .with_code("LIFE-004"));
        }
        // Refuse removals that would leave a dangling reference, such as a web
        // server still bound by a project container, before anything is written.
        project.validate()?;

        let mut report = LifecycleReport::new(Operation::RemoveService);
        report.total = 1;

        let compose = ComposeFile::in_project(paths.root());
        let mut document = compose.load()?.remove_docker_service(service);
        for container in &project.containers {
            match self.registrars.apply(document.clone(), container, &project) {
                Ok(updated) => document = updated,
                Err(err) => report.failure(container.docker_service_name(), &err),
            }
        }
        self.store.save(&project)?;
        compose.save(&document)?;
        report.success(service);

        self.publish_summary(&project, &report);
        Ok(report)
    }
}
