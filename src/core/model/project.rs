use crate::core::error::AppError;
use crate::core::model::container::{Container, ProjectContainer, ServiceContainer, ServiceKind};
use crate::core::types::{Environment, ErrorCategory};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Client-scoped development environment made of containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub client: String,
    pub project: String,
    #[serde(default)]
    pub environment: Environment,
    /// External proxy network; empty means the configured default.
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Project {
    pub fn new(client: &str, project: &str, environment: Environment, network: &str) -> Self {
        Self {
            client: client.to_string(),
            project: project.to_string(),
            environment,
            network: network.to_string(),
            containers: Vec::new(),
        }
    }

    pub fn with_container(mut self, container: impl Into<Container>) -> Self {
        self.containers.push(container.into());
        self
    }

    /// Value used for `COMPOSE_PROJECT_NAME` so projects never share compose state.
    pub fn compose_project_name(&self) -> String {
        format!("{}-{}", self.client, self.project).to_lowercase()
    }

    pub fn project_containers(&self) -> impl Iterator<Item = &ProjectContainer> {
        self.containers.iter().filter_map(Container::as_project)
    }

    pub fn service_containers(&self) -> impl Iterator<Item = &ServiceContainer> {
        self.containers.iter().filter_map(Container::as_service)
    }

    pub fn find_container(&self, service_name: &str) -> Option<&Container> {
        self.containers
            .iter()
            .find(|container| container.docker_service_name() == service_name)
    }

    /// Service container able to store data for other containers.
    pub fn find_database(&self, service_name: &str) -> Option<&ServiceContainer> {
        self.service_containers()
            .find(|service| service.docker_service_name == service_name && service.kind.is_database())
    }

    /// Project containers routed through the given web server service.
    pub fn containers_bound_to<'a>(
        &'a self,
        web_server: &'a str,
    ) -> impl Iterator<Item = &'a ProjectContainer> + 'a {
        self.project_containers().filter(move |container| {
            container
                .web_server
                .as_ref()
                .map(|binding| binding.service == web_server)
                .unwrap_or(false)
        })
    }

    /// Remove a container by docker service name, returning it when present.
    pub fn remove_container(&mut self, service_name: &str) -> Option<Container> {
        let index = self
            .containers
            .iter()
            .position(|container| container.docker_service_name() == service_name)?;
        Some(self.containers.remove(index))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.client.trim().is_empty() || self.project.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "client and project names cannot be empty",
            )
            .with_code("MODEL-004"));
        }

        let mut seen = HashSet::new();
        for container in &self.containers {
            if !seen.insert(container.docker_service_name()) {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!(
                        "docker service name '{}' is used more than once",
                        container.docker_service_name()
                    ),
                )
                .with_code("MODEL-005"));
            }
            container.validate()?;
        }

        let mut listen_ports: HashMap<&str, u16> = HashMap::new();
        for container in self.project_containers() {
            if let Some(binding) = &container.web_server {
                let port = *listen_ports.entry(binding.service.as_str()).or_insert(binding.port);
                if port != binding.port {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "containers bound to web server '{}' listen on different ports ({} and {})",
                            binding.service, port, binding.port
                        ),
                    )
                    .with_code("MODEL-007"));
                }
                let bound = self.service_containers().any(|service| {
                    service.docker_service_name == binding.service
                        && service.kind == ServiceKind::Nginx
                });
                if !bound {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "container '{}' is bound to unknown web server '{}'",
                            container.docker_service_name, binding.service
                        ),
                    )
                    .with_code("MODEL-006"));
                }
            }
        }
        Ok(())
    }
}

/// Image and container name of a built project container.
pub fn final_tag_name(project: &Project, container: &ProjectContainer) -> String {
    tag_name(
        &project.client,
        &project.project,
        &container.folder_name,
        project.environment,
    )
}

pub fn tag_name(client: &str, project: &str, folder: &str, environment: Environment) -> String {
    format!("{}-{}-{}-{}", client, project, folder, environment).to_lowercase()
}
