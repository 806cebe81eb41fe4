#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` through a sibling temp file and an atomic rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AppError> {
    let parent = path.parent().ok_or_else(|| {
        AppError::new(
            ErrorCategory::FilesystemError,
            format!("path {} has no parent directory", path.display()),
        )
        .with_code("FS-001")
    })?;
    fs::create_dir_all(parent).map_err(|err| {
        AppError::with_source(
            ErrorCategory::FilesystemError,
            format!("failed to create directory {}", parent.display()),
            err,
        )
        .with_code("FS-002")
    })?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.persist(path).map_err(|err| {
        AppError::with_source(
            ErrorCategory::FilesystemError,
            format!("failed to persist {}", path.display()),
            err.error,
        )
        .with_code("FS-003")
    })?;
    Ok(())
}

/// True when the directory is missing or has no entries.
pub fn is_dir_empty(path: &Path) -> Result<bool, AppError> {
    if !path.exists() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(path)?;
    Ok(entries.next().is_none())
}

pub fn ensure_dir(path: &Path) -> Result<(), AppError> {
    fs::create_dir_all(path).map_err(|err| {
        AppError::with_source(
            ErrorCategory::FilesystemError,
            format!("failed to create directory {}", path.display()),
            err,
        )
        .with_code("FS-002")
    })
}

/// Write the file only when it does not exist yet. Returns whether it was written.
pub fn write_if_absent(path: &Path, content: &str) -> Result<bool, AppError> {
    if path.exists() {
        return Ok(false);
    }
    write_atomic(path, content.as_bytes())?;
    Ok(true)
}
