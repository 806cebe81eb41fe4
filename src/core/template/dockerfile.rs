#![allow(clippy::result_large_err)]

//! Preservation of the user-editable block of generated Dockerfiles.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub const CUSTOM_BLOCK_START: &str = "## Custom code Here";
pub const CUSTOM_BLOCK_END: &str = "## End Custom code ##";

fn block_bounds(content: &str) -> Option<(usize, usize)> {
    let start_line = content.find(CUSTOM_BLOCK_START)?;
    let body_start = start_line + content[start_line..].find('\n')? + 1;
    let body_end = body_start + content[body_start..].find(CUSTOM_BLOCK_END)?;
    Some((body_start, body_end))
}

/// Text between the custom markers, exactly as written.
///
/// A start marker without its end marker is an error: the block cannot be told
/// apart from generated text, so nothing may be rewritten.
pub fn extract_custom_block(content: &str) -> Result<Option<&str>, AppError> {
    if let Some((start, end)) = block_bounds(content) {
        return Ok(Some(&content[start..end]));
    }
    if content.contains(CUSTOM_BLOCK_START) {
        return Err(AppError::new(
            ErrorCategory::ValidationError,
            format!("custom block is missing its closing '{}' marker", CUSTOM_BLOCK_END),
        )
        .with_code("TEMPLATE-001"));
    }
    Ok(None)
}

/// Replace the custom block of a freshly rendered Dockerfile with `block`.
///
/// Templates without markers are returned unchanged.
pub fn inject_custom_block(rendered: &str, block: &str) -> String {
    match block_bounds(rendered) {
        Some((start, end)) => {
            let mut merged = String::with_capacity(rendered.len() + block.len());
            merged.push_str(&rendered[..start]);
            merged.push_str(block);
            merged.push_str(&rendered[end..]);
            merged
        }
        None => rendered.to_string(),
    }
}
