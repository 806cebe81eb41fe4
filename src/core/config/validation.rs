#![allow(clippy::result_large_err)]

use super::LauncherConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &LauncherConfig) -> Result<(), AppError> {
        if config.projects_dir.as_os_str().is_empty() {
            return Err(invalid("projects_dir cannot be empty"));
        }

        if config.traefik_network.trim().is_empty() {
            return Err(invalid("traefik_network cannot be empty"));
        }

        if config.process.idle_timeout.is_zero() {
            return Err(invalid("process.idle_timeout must be greater than zero"));
        }

        if config.readiness.interval.is_zero() {
            return Err(invalid("readiness.interval must be greater than zero"));
        }

        if config.events.queue_size == 0 {
            return Err(invalid("events.queue_size must be greater than zero"));
        }

        if config.events.topic.trim().is_empty() {
            return Err(invalid("events.topic cannot be empty"));
        }

        if config.images.composer.trim().is_empty() || config.images.node_scaffold.trim().is_empty() {
            return Err(invalid("images.composer and images.node_scaffold cannot be empty"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::new(ErrorCategory::ConfigurationError, message).with_code("CONFIG-003")
}
