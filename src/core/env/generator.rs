#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::model::{Project, ProjectContainer};
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use std::sync::Arc;

/// Ordered `KEY=VALUE` set written to env files.
pub type EnvVariables = IndexMap<String, String>;

/// Produces the environment of one project container category.
pub trait EnvVariableGenerator: Send + Sync {
    fn supports(&self, container: &ProjectContainer) -> bool;

    /// Full runtime set written to `docker/<folder>/.env`.
    fn generate_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError>;

    /// Build arguments of the shared socle image: runtime version and environment only.
    fn generate_socle_env_variables(
        &self,
        container: &ProjectContainer,
        project: &Project,
    ) -> Result<EnvVariables, AppError>;
}

/// Docker version of the container, or a configuration error naming it.
pub fn require_version(container: &ProjectContainer) -> Result<&str, AppError> {
    container.docker_version.as_deref().ok_or_else(|| {
        AppError::new(
            ErrorCategory::ConfigurationError,
            format!(
                "container '{}' has no docker version",
                container.docker_service_name
            ),
        )
        .with_code("ENV-001")
        .with_context("container", container.docker_service_name.clone())
    })
}

/// Keys shared by every project container category.
pub fn common_variables(container: &ProjectContainer, project: &Project) -> EnvVariables {
    let framework = container.framework.as_ref();
    let port = container.http_port();

    let mut variables = EnvVariables::new();
    let mut set = |key: &str, value: String| {
        variables.insert(key.to_string(), value);
    };
    set("PROJECT", project.project.clone());
    set("CLIENT", project.client.clone());
    set("DOCKER_ENV", project.environment.to_string());
    set("TRAEFIK_NETWORK", project.network.clone());
    set("FOLDER_NAME", container.folder_name.clone());
    set("SERVICE_TYPE", container.kind.slug().to_string());
    set(
        "URL_LOCAL_WEBSITE",
        container.url_service.clone().unwrap_or_default(),
    );
    set(
        "ENABLE_LOCAL_SERVER",
        container.web_server.is_none().to_string(),
    );
    set("PORT_NUMBER", port.to_string());
    set(
        "INDEX_FOLDER",
        framework
            .map(|framework| framework.public_folder.clone())
            .unwrap_or_default(),
    );
    set(
        "INSTALL_QUALITY_TOOLS",
        framework
            .map(|framework| framework.install_quality_tools)
            .unwrap_or(false)
            .to_string(),
    );
    set(
        "SHOULD_USE_COMPOSER",
        framework
            .map(|framework| framework.use_composer)
            .unwrap_or(false)
            .to_string(),
    );
    set(
        "FRAMEWORK",
        framework
            .map(|framework| framework.name.as_str().to_lowercase())
            .unwrap_or_default(),
    );
    set(
        "FRAMEWORK_VERSION",
        framework
            .and_then(|framework| framework.version.clone())
            .unwrap_or_default(),
    );
    variables
}

/// Generators indexed by the categories they support, in registration order.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Arc<dyn EnvVariableGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self::new()
            .register(Arc::new(super::PhpEnvGenerator))
            .register(Arc::new(super::NodeEnvGenerator))
    }

    pub fn register(mut self, generator: Arc<dyn EnvVariableGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn for_container(
        &self,
        container: &ProjectContainer,
    ) -> Result<&dyn EnvVariableGenerator, AppError> {
        self.generators
            .iter()
            .find(|generator| generator.supports(container))
            .map(|generator| generator.as_ref())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!("no env generator supports {} containers", container.kind),
                )
                .with_code("ENV-002")
            })
    }
}
