#![allow(clippy::result_large_err)]

use super::PRIORITY_ACCESS_RIGHT;
use crate::core::error::AppError;
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use async_trait::async_trait;
use std::path::Path;

/// Dependency-manager caches left untouched by the permission sweep.
pub const SKIPPED_DIRS: &[&str] = &[".composer", ".npm", ".cache", ".yarn"];

/// Makes the application folder group-writable so host and container users can both edit it.
pub struct AccessRight;

#[async_trait]
impl StepHandler for AccessRight {
    fn step(&self) -> ApplicationStep {
        ApplicationStep::AccessRight
    }

    fn priority(&self) -> i32 {
        PRIORITY_ACCESS_RIGHT
    }

    async fn execute(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.container_dir();
        if !dir.exists() {
            return Ok(());
        }
        let updated = tokio::task::spawn_blocking(move || grant_group_access(&dir))
            .await
            .map_err(anyhow::Error::from)??;
        tracing::debug!(folder = %ctx.container.folder_name, updated, "updated access rights");
        Ok(())
    }
}

/// Recursively add group read/write (and traverse on directories). Returns the entries changed.
#[cfg(unix)]
pub fn grant_group_access(root: &Path) -> Result<usize, AppError> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn widen(path: &Path, is_dir: bool) -> Result<bool, AppError> {
        let mut permissions = fs::metadata(path)?.permissions();
        let extra = if is_dir { 0o775 } else { 0o664 };
        let mode = permissions.mode();
        if mode & extra == extra {
            return Ok(false);
        }
        permissions.set_mode(mode | extra);
        fs::set_permissions(path, permissions)?;
        Ok(true)
    }

    let mut updated = usize::from(widen(root, true)?);
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_symlink() {
                continue;
            }
            let name = entry.file_name();
            if file_type.is_dir() && SKIPPED_DIRS.iter().any(|skipped| name == *skipped) {
                continue;
            }
            if widen(&entry.path(), file_type.is_dir())? {
                updated += 1;
            }
            if file_type.is_dir() {
                pending.push(entry.path());
            }
        }
    }
    Ok(updated)
}

#[cfg(not(unix))]
pub fn grant_group_access(_root: &Path) -> Result<usize, AppError> {
    Ok(0)
}
