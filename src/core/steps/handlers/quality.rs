use super::PRIORITY_QUALITY;
use crate::core::docker::run_ephemeral;
use crate::core::error::AppError;
use crate::core::model::ProjectKind;
use crate::core::process::run_checked;
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::template::{PHPSTAN_CONFIG, PHP_CS_FIXER_CONFIG};
use crate::core::types::ErrorCategory;
use crate::utils::write_if_absent;
use async_trait::async_trait;

pub const QUALITY_PACKAGES: &[&str] = &["phpstan/phpstan", "friendsofphp/php-cs-fixer"];

/// Installs phpstan and php-cs-fixer and drops their default configuration.
pub struct PhpQuality;

#[async_trait]
impl StepHandler for PhpQuality {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::PhpQuality
    }

    fn priority(&self) -> i32 {
        PRIORITY_QUALITY
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let enabled = ctx
            .container
            .framework
            .as_ref()
            .map(|framework| framework.install_quality_tools)
            .unwrap_or(false);
        if ctx.container.kind != ProjectKind::Php || !enabled || ctx.awaits_clone() {
            return Ok(());
        }

        let dir = ctx.container_dir();
        let manifest = dir.join("composer.json");
        if !manifest.exists() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!("{} has no composer.json", ctx.container.folder_name),
            )
            .with_code("QUALITY-001"));
        }
        let composer: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&manifest)?)?;
        let missing: Vec<&str> = QUALITY_PACKAGES
            .iter()
            .copied()
            .filter(|package| composer["require-dev"].get(*package).is_none())
            .collect();

        if !missing.is_empty() {
            let command = ["composer", "require", "--dev", "--no-interaction"]
                .into_iter()
                .chain(missing.iter().copied());
            let request = run_ephemeral(&dir, &ctx.services.images.composer, "/app", command)
                .with_label(format!("Installing quality tools in {}", ctx.container.folder_name));
            run_checked(ctx.runner(), &request).await?;
        }

        write_if_absent(&dir.join("phpstan.neon"), PHPSTAN_CONFIG)?;
        write_if_absent(&dir.join(".php-cs-fixer.dist.php"), PHP_CS_FIXER_CONFIG)?;
        Ok(())
    }
}
