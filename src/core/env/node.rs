#![allow(clippy::result_large_err)]

use crate::core::env::generator::{
    common_variables, require_version, EnvVariableGenerator, EnvVariables,
};
use crate::core::error::AppError;
use crate::core::model::{Project, ProjectContainer, ProjectKind};

pub struct NodeEnvGenerator;

impl EnvVariableGenerator for NodeEnvGenerator {
    fn supports(&self, container: &ProjectContainer) -> bool {
        container.kind == ProjectKind::Node
    }

    fn generate_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError> {
        let version = require_version(container)?;
        let mut variables = common_variables(container, project);
        variables.insert("NODE_VERSION".to_string(), version.to_string());
        Ok(variables)
    }

    fn generate_socle_env_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError> {
        let version = require_version(container)?;
        Ok(EnvVariables::from([
            ("NODE_VERSION".to_string(), version.to_string()),
            ("DOCKER_ENV".to_string(), project.environment.to_string()),
        ]))
    }
}
