#![allow(clippy::result_large_err)]

//! Application scaffolding run inside throwaway containers.

use super::{PRIORITY_CREATE, PRIORITY_PACKAGE_INIT};
use crate::core::docker::run_ephemeral;
use crate::core::env::require_version;
use crate::core::error::AppError;
use crate::core::model::{FrameworkName, ProjectKind};
use crate::core::process::run_checked;
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::utils::{ensure_dir, is_dir_empty};
use async_trait::async_trait;

const SCAFFOLD_WORKDIR: &str = "/app";

fn framework_is(ctx: &StepContext<'_>, name: FrameworkName) -> bool {
    ctx.container
        .framework
        .as_ref()
        .map(|framework| framework.name == name)
        .unwrap_or(false)
}

/// Selected framework version, or the newest one of the catalog.
fn framework_version(ctx: &StepContext<'_>, name: FrameworkName) -> String {
    ctx.container
        .framework
        .as_ref()
        .and_then(|framework| framework.version.clone())
        .or_else(|| name.version_supported().first().map(|v| v.to_string()))
        .unwrap_or_default()
}

fn node_image(ctx: &StepContext<'_>) -> Result<String, AppError> {
    let version = require_version(ctx.container)?;
    Ok(ctx.services.images.node_image(version))
}

/// Run `commands` in `image` unless the application folder already has content.
///
/// Containers declaring a repository are never scaffolded, even when the clone failed.
async fn scaffold(
    ctx: &StepContext<'_>,
    name: FrameworkName,
    image: &str,
    commands: Vec<Vec<String>>,
) -> Result<(), AppError> {
    if ctx.container.repository.is_some() {
        tracing::debug!(folder = %ctx.container.folder_name, framework = %name, "repository declared, skipping scaffolding");
        return Ok(());
    }
    let dir = ctx.container_dir();
    if !is_dir_empty(&dir)? {
        tracing::info!(folder = %ctx.container.folder_name, framework = %name, "folder not empty, skipping scaffolding");
        return Ok(());
    }
    ensure_dir(&dir)?;

    for command in commands {
        let request = run_ephemeral(&dir, image, SCAFFOLD_WORKDIR, command).with_label(format!(
            "Creating {} application in {}",
            name, ctx.container.folder_name
        ));
        run_checked(ctx.runner(), &request).await?;
    }
    Ok(())
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

pub struct SymfonyCreate;

#[async_trait]
impl StepHandler for SymfonyCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::SymfonyCreate
    }

    fn priority(&self) -> i32 {
        PRIORITY_CREATE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if !framework_is(ctx, FrameworkName::Symfony) {
            return Ok(());
        }
        let package = format!(
            "symfony/skeleton:{}.*",
            framework_version(ctx, FrameworkName::Symfony)
        );
        let command = args(&["composer", "create-project", package.as_str(), ".", "--no-interaction", "--prefer-dist"]);
        scaffold(ctx, FrameworkName::Symfony, &ctx.services.images.composer, vec![command]).await
    }
}

pub struct LaravelCreate;

#[async_trait]
impl StepHandler for LaravelCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::LaravelCreate
    }

    fn priority(&self) -> i32 {
        PRIORITY_CREATE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if !framework_is(ctx, FrameworkName::Laravel) {
            return Ok(());
        }
        let package = format!(
            "laravel/laravel:^{}.0",
            framework_version(ctx, FrameworkName::Laravel)
        );
        let command = args(&["composer", "create-project", package.as_str(), ".", "--no-interaction", "--prefer-dist"]);
        scaffold(ctx, FrameworkName::Laravel, &ctx.services.images.composer, vec![command]).await
    }
}

pub struct NextCreate;

#[async_trait]
impl StepHandler for NextCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::NextCreate
    }

    fn priority(&self) -> i32 {
        PRIORITY_CREATE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if !framework_is(ctx, FrameworkName::Next) {
            return Ok(());
        }
        let image = node_image(ctx)?;
        let package = format!("create-next-app@{}", framework_version(ctx, FrameworkName::Next));
        let command = args(&[
            "npx", "--yes", package.as_str(), ".", "--ts", "--eslint", "--app", "--use-npm",
            "--no-tailwind", "--no-src-dir", "--import-alias", "@/*",
        ]);
        scaffold(ctx, FrameworkName::Next, &image, vec![command]).await
    }
}

pub struct NestCreate;

#[async_trait]
impl StepHandler for NestCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::NestCreate
    }

    fn priority(&self) -> i32 {
        PRIORITY_CREATE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if !framework_is(ctx, FrameworkName::Nest) {
            return Ok(());
        }
        let image = node_image(ctx)?;
        let package = format!("@nestjs/cli@{}", framework_version(ctx, FrameworkName::Nest));
        let command = args(&[
            "npx", "--yes", package.as_str(), "new", ".", "--package-manager", "npm", "--skip-git",
        ]);
        scaffold(ctx, FrameworkName::Nest, &image, vec![command]).await
    }
}

pub struct ReactCreate;

#[async_trait]
impl StepHandler for ReactCreate {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::ReactCreate
    }

    fn priority(&self) -> i32 {
        PRIORITY_CREATE
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        if !framework_is(ctx, FrameworkName::React) {
            return Ok(());
        }
        let image = node_image(ctx)?;
        let version = framework_version(ctx, FrameworkName::React);
        let react = format!("react@{}", version);
        let react_dom = format!("react-dom@{}", version);
        let commands = vec![
            args(&["npx", "--yes", "create-vite@latest", ".", "--template", "react-ts"]),
            args(&["npm", "install", react.as_str(), react_dom.as_str()]),
        ];
        scaffold(ctx, FrameworkName::React, &image, commands).await
    }
}

/// `composer init` for PHP containers using composer without a scaffolded framework.
pub struct ComposerInit;

#[async_trait]
impl StepHandler for ComposerInit {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::ComposerInit
    }

    fn priority(&self) -> i32 {
        PRIORITY_PACKAGE_INIT
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let uses_composer = ctx
            .container
            .framework
            .as_ref()
            .map(|framework| framework.use_composer)
            .unwrap_or(false);
        let dir = ctx.container_dir();
        if ctx.container.kind != ProjectKind::Php
            || !uses_composer
            || ctx.awaits_clone()
            || dir.join("composer.json").exists()
        {
            return Ok(());
        }
        ensure_dir(&dir)?;

        let package = format!(
            "{}/{}",
            ctx.project.client.to_lowercase(),
            ctx.container.folder_name.to_lowercase()
        );
        let request = run_ephemeral(
            &dir,
            &ctx.services.images.composer,
            SCAFFOLD_WORKDIR,
            ["composer", "init", "--no-interaction", "--name", package.as_str()],
        )
        .with_label(format!("Initializing composer in {}", ctx.container.folder_name));
        run_checked(ctx.runner(), &request).await?;
        Ok(())
    }
}

/// `npm init` for Node containers without a `package.json`.
pub struct NpmInit;

#[async_trait]
impl StepHandler for NpmInit {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::NpmInit
    }

    fn priority(&self) -> i32 {
        PRIORITY_PACKAGE_INIT
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.container_dir();
        if ctx.container.kind != ProjectKind::Node
            || ctx.awaits_clone()
            || dir.join("package.json").exists()
        {
            return Ok(());
        }
        ensure_dir(&dir)?;
        let image = node_image(ctx)?;
        let request = run_ephemeral(&dir, &image, SCAFFOLD_WORKDIR, ["npm", "init", "-y"])
            .with_label(format!("Initializing npm in {}", ctx.container.folder_name));
        run_checked(ctx.runner(), &request).await?;
        Ok(())
    }
}
