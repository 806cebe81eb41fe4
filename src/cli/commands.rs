use crate::cli::args::{
    BuildArgs, DeleteArgs, ProjectArgs, RemoveServiceArgs, RenameClientArgs, RenameProjectArgs,
    StartArgs,
};
use crate::cli::context::CommandContext;
use crate::core::error::AppError;
use crate::core::orchestrator::{LifecycleReport, StartOptions};
use crate::Result;
use anyhow::{anyhow, bail};
use std::path::PathBuf;

/// Print the report and fail the command when any container failed.
fn conclude(outcome: std::result::Result<LifecycleReport, AppError>) -> Result<()> {
    let report = outcome?;
    println!("{}", report.summary());
    for failure in &report.failures {
        eprintln!("  {}: {}", failure.service, failure.error);
    }
    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} failed for {} container(s)",
            report.operation,
            report.failures.len()
        ))
    }
}

pub async fn generate(config: Option<PathBuf>, target: ProjectArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let outcome = conclude(ctx.launcher.generate(&target.client, &target.project).await);
    ctx.finish().await;
    outcome
}

pub async fn build(config: Option<PathBuf>, args: BuildArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let outcome = conclude(
        ctx.launcher
            .build(&args.target.client, &args.target.project, &args.services)
            .await,
    );
    ctx.finish().await;
    outcome
}

pub async fn start(config: Option<PathBuf>, args: StartArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let options = StartOptions {
        wait: args.wait,
        timeout: args.timeout,
    };
    let outcome = conclude(
        ctx.launcher
            .start(&args.target.client, &args.target.project, options)
            .await,
    );
    ctx.finish().await;
    outcome
}

pub async fn stop(config: Option<PathBuf>, target: ProjectArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let outcome = conclude(ctx.launcher.stop(&target.client, &target.project).await);
    ctx.finish().await;
    outcome
}

pub async fn delete(config: Option<PathBuf>, args: DeleteArgs) -> Result<()> {
    if !args.yes {
        bail!(
            "refusing to delete {}/{} without --yes",
            args.target.client,
            args.target.project
        );
    }
    let ctx = CommandContext::build(config.as_deref())?;
    let outcome = conclude(
        ctx.launcher
            .delete(&args.target.client, &args.target.project)
            .await,
    );
    ctx.finish().await;
    outcome
}

pub async fn show(config: Option<PathBuf>, target: ProjectArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let project = ctx.launcher.load_project(&target.client, &target.project);
    ctx.finish().await;
    println!("{}", serde_json::to_string_pretty(&project?)?);
    Ok(())
}

pub async fn remove_service(config: Option<PathBuf>, args: RemoveServiceArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let outcome = conclude(
        ctx.launcher
            .remove_service(&args.target.client, &args.target.project, &args.service)
            .await,
    );
    ctx.finish().await;
    outcome
}

pub async fn rename_project(config: Option<PathBuf>, args: RenameProjectArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let renamed = ctx
        .store
        .rename_project(&args.target.client, &args.target.project, &args.new_name);
    ctx.finish().await;
    let renamed = renamed?;
    println!(
        "renamed {}/{} to {}/{}",
        args.target.client, args.target.project, renamed.client, renamed.project
    );
    println!(
        "run `launcher generate {} {}` to refresh generated files",
        renamed.client, renamed.project
    );
    Ok(())
}

pub async fn rename_client(config: Option<PathBuf>, args: RenameClientArgs) -> Result<()> {
    let ctx = CommandContext::build(config.as_deref())?;
    let renamed = ctx.store.rename_client(&args.client, &args.new_client);
    ctx.finish().await;
    println!(
        "renamed client {} to {} ({} project(s))",
        args.client,
        args.new_client,
        renamed?.len()
    );
    Ok(())
}
