use super::PRIORITY_INSTALL_DEPENDENCIES;
use crate::core::docker::compose;
use crate::core::error::AppError;
use crate::core::model::ProjectKind;
use crate::core::process::run_checked;
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::types::DockerAction;
use async_trait::async_trait;

/// Installs dependencies inside the running container when they are missing on disk.
pub struct InstallDependencies;

#[async_trait]
impl StepHandler for InstallDependencies {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::InstallDependencies
    }

    fn action(&self) -> DockerAction {
        DockerAction::Start
    }

    fn priority(&self) -> i32 {
        PRIORITY_INSTALL_DEPENDENCIES
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.container_dir();
        let (manifest, installed, command): (&str, &str, &[&str]) = match ctx.container.kind {
            ProjectKind::Php => ("composer.json", "vendor", &["composer", "install", "--no-interaction"]),
            ProjectKind::Node => ("package.json", "node_modules", &["npm", "install"]),
        };
        if !dir.join(manifest).exists() || dir.join(installed).exists() {
            return Ok(());
        }

        let service = ctx.container.docker_service_name.as_str();
        let args = ["exec", "-T", service].into_iter().chain(command.iter().copied());
        let request = compose(ctx.project, ctx.paths.root(), args)
            .with_label(format!("Installing dependencies of {}", service));
        run_checked(ctx.runner(), &request).await?;
        Ok(())
    }
}
