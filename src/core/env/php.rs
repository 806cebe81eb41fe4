#![allow(clippy::result_large_err)]

use crate::core::env::generator::{
    common_variables, require_version, EnvVariableGenerator, EnvVariables,
};
use crate::core::error::AppError;
use crate::core::model::{Project, ProjectContainer, ProjectKind};

pub struct PhpEnvGenerator;

impl EnvVariableGenerator for PhpEnvGenerator {
    fn supports(&self, container: &ProjectContainer) -> bool {
        container.kind == ProjectKind::Php
    }

    fn generate_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError> {
        let version = require_version(container)?;
        let mut variables = common_variables(container, project);
        variables.insert("PHP_VERSION".to_string(), version.to_string());
        variables.insert(
            "PHP_EXTENSIONS".to_string(),
            container.all_extensions().join(" "),
        );
        Ok(variables)
    }

    fn generate_socle_env_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError> {
        let version = require_version(container)?;
        Ok(EnvVariables::from([
            ("PHP_VERSION".to_string(), version.to_string()),
            ("DOCKER_ENV".to_string(), project.environment.to_string()),
        ]))
    }
}
