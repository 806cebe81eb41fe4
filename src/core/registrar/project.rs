#![allow(clippy::result_large_err)]

use super::{
    host_rule, traefik_labels, wrong_container, DockerServiceRegistrar, BASE_COMPOSE_FILE,
    DEFAULT_NETWORK_KEY, TRAEFIK_NETWORK_KEY,
};
use crate::core::compose::{BuildContext, ComposeDocument, Extends, ServiceStanza};
use crate::core::error::AppError;
use crate::core::model::{final_tag_name, Container, Project};

pub struct ProjectRegistrar;

impl DockerServiceRegistrar for ProjectRegistrar {
    fn name(&self) -> &'static str {
        "project"
    }

    fn supports(&self, container: &Container) -> bool {
        matches!(container, Container::Project(_))
    }

    fn register(
        &self,
        document: ComposeDocument,
        container: &Container,
        project: &Project,
    ) -> Result<ComposeDocument, AppError> {
        let Some(container) = container.as_project() else {
            return Err(wrong_container(self.name(), container));
        };
        let tag = final_tag_name(project, container);
        let working_dir = container.kind.working_dir();

        // Containers behind a web server are routed by that server's stanza.
        let labels = match (&container.url_service, &container.web_server) {
            (Some(url), None) => traefik_labels(
                &tag,
                &host_rule(url),
                container.http_port(),
                &project.network,
            ),
            _ => Vec::new(),
        };

        let depends_on = container
            .data_storages
            .iter()
            .filter(|name| project.find_database(name).is_some())
            .cloned()
            .collect();

        let stanza = ServiceStanza {
            image: Some(tag.clone()),
            container_name: Some(tag),
            networks: vec![
                DEFAULT_NETWORK_KEY.to_string(),
                TRAEFIK_NETWORK_KEY.to_string(),
            ],
            volumes: vec![format!("./{}:{}", container.folder_name, working_dir)],
            labels,
            depends_on,
            extends: Some(Extends {
                file: BASE_COMPOSE_FILE.to_string(),
                service: format!("{}-{}", container.kind.slug(), project.environment),
            }),
            env_file: vec![format!("docker/{}/.env", container.folder_name)],
            build: Some(BuildContext {
                context: ".".to_string(),
                dockerfile: Some(format!("docker/{}/Dockerfile", container.folder_name)),
            }),
            working_dir: Some(working_dir.to_string()),
            ..ServiceStanza::default()
        };
        Ok(document.add_docker_service(&container.docker_service_name, stanza))
    }
}
