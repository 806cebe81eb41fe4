#![allow(clippy::result_large_err)]

use super::{
    host_rule, traefik_labels, wrong_container, DockerServiceRegistrar, DEFAULT_NETWORK_KEY,
    TRAEFIK_NETWORK_KEY,
};
use crate::core::compose::{ComposeDocument, ServiceStanza};
use crate::core::error::AppError;
use crate::core::model::{tag_name, Container, Project, ServiceKind};

/// Listen port when no container is bound to the server.
const NGINX_PORT: u16 = 80;
pub const NGINX_ROOT: &str = "/var/www/html";

/// Front web server aggregating every project container bound to it.
pub struct NginxRegistrar;

impl DockerServiceRegistrar for NginxRegistrar {
    fn name(&self) -> &'static str {
        "nginx"
    }

    fn supports(&self, container: &Container) -> bool {
        container
            .as_service()
            .map(|service| service.kind == ServiceKind::Nginx)
            .unwrap_or(false)
    }

    fn register(
        &self,
        document: ComposeDocument,
        container: &Container,
        project: &Project,
    ) -> Result<ComposeDocument, AppError> {
        let Some(service) = container.as_service() else {
            return Err(wrong_container(self.name(), container));
        };
        let name = &service.docker_service_name;
        let tag = tag_name(&project.client, &project.project, name, project.environment);
        let bound: Vec<_> = project.containers_bound_to(name).collect();

        let hosts: Vec<String> = service
            .url_service
            .iter()
            .chain(bound.iter().filter_map(|container| container.url_service.as_ref()))
            .map(|host| host_rule(host))
            .collect();
        let labels = if hosts.is_empty() {
            Vec::new()
        } else {
            // Bound sites share one listen port, checked by `Project::validate`.
            let port = bound
                .first()
                .and_then(|container| container.web_server.as_ref())
                .map(|binding| binding.port)
                .unwrap_or(NGINX_PORT);
            traefik_labels(&tag, &hosts.join(" || "), port, &project.network)
        };

        let mut volumes = vec![format!(
            "./docker/{}/conf.d:/etc/nginx/conf.d:ro",
            service.folder_name
        )];
        volumes.extend(
            bound
                .iter()
                .map(|container| format!("./{0}:{1}/{0}", container.folder_name, NGINX_ROOT)),
        );

        let stanza = ServiceStanza {
            image: Some(format!(
                "{}:{}",
                service.kind.image(),
                service.docker_version.as_deref().unwrap_or("latest")
            )),
            container_name: Some(tag),
            networks: vec![
                DEFAULT_NETWORK_KEY.to_string(),
                TRAEFIK_NETWORK_KEY.to_string(),
            ],
            volumes,
            labels,
            depends_on: bound
                .iter()
                .map(|container| container.docker_service_name.clone())
                .collect(),
            ..ServiceStanza::default()
        };
        Ok(document.add_docker_service(name, stanza))
    }
}
