#![allow(clippy::result_large_err)]

//! Translation of containers into compose service stanzas.

pub mod database;
pub mod nginx;
pub mod project;

pub use database::DatabaseRegistrar;
pub use nginx::NginxRegistrar;
pub use project::ProjectRegistrar;

use crate::core::compose::ComposeDocument;
use crate::core::error::AppError;
use crate::core::model::{Container, Project};
use crate::core::types::ErrorCategory;
use std::sync::Arc;

/// Shared compose file holding the `{type}-{env}` base services project stanzas extend.
pub const BASE_COMPOSE_FILE: &str = "docker/compose.base.yml";
/// Key of the external reverse-proxy network in compose documents.
pub const TRAEFIK_NETWORK_KEY: &str = "traefik";
pub const DEFAULT_NETWORK_KEY: &str = "default";

/// Writes the stanza of one container category into the compose document.
pub trait DockerServiceRegistrar: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, container: &Container) -> bool;

    fn register(
        &self,
        document: ComposeDocument,
        container: &Container,
        project: &Project,
    ) -> Result<ComposeDocument, AppError>;
}

/// Labels routing `rule` to `port` through the reverse proxy.
pub fn traefik_labels(router: &str, rule: &str, port: u16, network: &str) -> Vec<String> {
    vec![
        "traefik.enable=true".to_string(),
        format!("traefik.http.routers.{}.rule={}", router, rule),
        format!("traefik.http.routers.{}.entrypoints=web", router),
        format!(
            "traefik.http.services.{}.loadbalancer.server.port={}",
            router, port
        ),
        format!("traefik.docker.network={}", network),
    ]
}

pub fn host_rule(host: &str) -> String {
    format!("Host(`{}`)", host)
}

#[derive(Clone, Default)]
pub struct RegistrarRegistry {
    registrars: Vec<Arc<dyn DockerServiceRegistrar>>,
}

impl RegistrarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self::new()
            .register(Arc::new(ProjectRegistrar))
            .register(Arc::new(DatabaseRegistrar))
            .register(Arc::new(NginxRegistrar))
    }

    pub fn register(mut self, registrar: Arc<dyn DockerServiceRegistrar>) -> Self {
        self.registrars.push(registrar);
        self
    }

    pub fn for_container(&self, container: &Container) -> Result<&dyn DockerServiceRegistrar, AppError> {
        self.registrars
            .iter()
            .find(|registrar| registrar.supports(container))
            .map(|registrar| registrar.as_ref())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ConfigurationError,
                    format!(
                        "no registrar supports {} container '{}'",
                        container.type_name(),
                        container.docker_service_name()
                    ),
                )
                .with_code("REG-001")
            })
    }

    /// Register one container with the first registrar supporting it.
    pub fn apply(
        &self,
        document: ComposeDocument,
        container: &Container,
        project: &Project,
    ) -> Result<ComposeDocument, AppError> {
        let registrar = self.for_container(container)?;
        tracing::debug!(
            registrar = registrar.name(),
            service = container.docker_service_name(),
            "registering compose service"
        );
        registrar.register(document, container, project)
    }
}

fn wrong_container(registrar: &str, container: &Container) -> AppError {
    AppError::new(
        ErrorCategory::InternalError,
        format!(
            "{} registrar cannot handle {} container '{}'",
            registrar,
            container.type_name(),
            container.docker_service_name()
        ),
    )
    .with_code("REG-002")
}
