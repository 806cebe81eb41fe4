//! Utility helpers: atomic file writes and directory checks.
pub mod files;

pub use files::{ensure_dir, is_dir_empty, write_atomic, write_if_absent};
