use super::{PRIORITY_GITIGNORE, PRIORITY_REPOSITORY};
use crate::core::error::AppError;
use crate::core::process::{run_checked, ProcessRequest};
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::template::{gitignore_entries, GITIGNORE_BASE};
use crate::utils::{ensure_dir, is_dir_empty, write_atomic};
use async_trait::async_trait;

/// Adds the project and container entries missing from the root `.gitignore`.
pub struct GitIgnoreCreate;

#[async_trait]
impl StepHandler for GitIgnoreCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::InitGitignore
    }

    fn priority(&self) -> i32 {
        PRIORITY_GITIGNORE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let path = ctx.paths.gitignore();
        let mut content = if path.exists() {
            std::fs::read_to_string(&path)?
        } else {
            String::new()
        };

        let wanted = GITIGNORE_BASE
            .iter()
            .map(|entry| entry.to_string())
            .chain(gitignore_entries(ctx.container.kind, &ctx.container.folder_name));
        let mut changed = false;
        for entry in wanted {
            if content.lines().any(|line| line.trim() == entry) {
                continue;
            }
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(&entry);
            content.push('\n');
            changed = true;
        }

        if changed {
            write_atomic(&path, content.as_bytes())?;
        }
        Ok(())
    }
}

/// Clones the container repository when one is declared and the folder is still empty.
pub struct GitClone;

#[async_trait]
impl StepHandler for GitClone {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::GitClone
    }

    fn priority(&self) -> i32 {
        PRIORITY_REPOSITORY
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let Some(repository) = &ctx.container.repository else {
            return Ok(());
        };
        if !is_dir_empty(&ctx.container_dir())? {
            tracing::info!(folder = %ctx.container.folder_name, "folder not empty, skipping clone");
            return Ok(());
        }

        let request = ProcessRequest::new(
            "git",
            [
                "clone",
                "--branch",
                repository.branch.as_str(),
                repository.url.as_str(),
                ctx.container.folder_name.as_str(),
            ],
        )
        .in_dir(ctx.paths.root())
        .with_label(format!(
            "Cloning {} ({}) into {}",
            repository.url, repository.branch, ctx.container.folder_name
        ));
        run_checked(ctx.runner(), &request).await?;
        Ok(())
    }
}

/// Creates the application folder of a container without a declared repository.
pub struct FolderProjectCreate;

#[async_trait]
impl StepHandler for FolderProjectCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::InitFolderRepository
    }

    fn priority(&self) -> i32 {
        PRIORITY_REPOSITORY
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        // Only the clone may create the folder of a declared repository.
        if ctx.container.repository.is_some() {
            return Ok(());
        }
        ensure_dir(&ctx.container_dir())
    }
}
