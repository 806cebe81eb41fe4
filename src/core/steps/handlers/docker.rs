//! Container build files: Dockerfile, runtime env file and application overlay.

use super::{PRIORITY_APPLICATION_ENV, PRIORITY_DOCKERFILE, PRIORITY_ENV_FILE};
use crate::core::env::write_env_file;
use crate::core::error::AppError;
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::template::{
    extract_custom_block, inject_custom_block, project_dockerfile, TemplateRenderer,
};
use crate::core::types::Environment;
use crate::utils::write_atomic;
use async_trait::async_trait;

/// Renders `docker/<folder>/Dockerfile`, carrying over the custom block of the previous file.
pub struct DockerfileService;

#[async_trait]
impl StepHandler for DockerfileService {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::Dockerfile
    }

    fn priority(&self) -> i32 {
        PRIORITY_DOCKERFILE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let generator = ctx.services.generators.for_container(ctx.container)?;
        let mut variables = generator.generate_variables(ctx.container, ctx.project)?;
        let npm_script = match ctx.project.environment {
            Environment::Dev => "dev",
            Environment::Prod => "start",
        };
        variables.insert("NPM_SCRIPT".to_string(), npm_script.to_string());

        let rendered = TemplateRenderer::render(project_dockerfile(ctx.container.kind), &variables);
        let path = ctx.paths.dockerfile(&ctx.container.folder_name);
        let content = if path.exists() {
            let previous = std::fs::read_to_string(&path)?;
            match extract_custom_block(&previous)
                .map_err(|err| err.with_context("path", path.display().to_string()))?
            {
                Some(block) => inject_custom_block(&rendered, block),
                None => rendered,
            }
        } else {
            rendered
        };
        write_atomic(&path, content.as_bytes())
    }
}

/// Writes the runtime `docker/<folder>/.env`.
pub struct EnvFileCreate;

#[async_trait]
impl StepHandler for EnvFileCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::EnvFile
    }

    fn priority(&self) -> i32 {
        PRIORITY_ENV_FILE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let generator = ctx.services.generators.for_container(ctx.container)?;
        let variables = generator.generate_variables(ctx.container, ctx.project)?;
        write_env_file(&ctx.paths.env_file(&ctx.container.folder_name), &variables)
    }
}

/// Writes the `.env.niji-launcher` overlay inside the application folder.
pub struct EnvFileApplication;

#[async_trait]
impl StepHandler for EnvFileApplication {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::EnvFileApplication
    }

    fn priority(&self) -> i32 {
        PRIORITY_APPLICATION_ENV
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if ctx.awaits_clone() {
            tracing::warn!(folder = %ctx.container.folder_name, "repository not cloned, skipping application env file");
            return Ok(());
        }
        let overlay = ctx.services.modifiers.apply(ctx.container, ctx.project);
        write_env_file(
            &ctx.paths.application_env_file(&ctx.container.folder_name),
            &overlay,
        )
    }
}
