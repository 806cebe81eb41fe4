#![allow(clippy::result_large_err)]

use super::{wrong_container, DockerServiceRegistrar, DEFAULT_NETWORK_KEY};
use crate::core::compose::{ComposeDocument, ServiceStanza, VolumeDefinition};
use crate::core::error::AppError;
use crate::core::model::{tag_name, Container, DatabaseCredentials, Project, ServiceKind};
use indexmap::IndexMap;

/// Registers MySQL, MariaDB, PostgreSQL and Redis services.
pub struct DatabaseRegistrar;

fn credentials_env(kind: ServiceKind, credentials: &DatabaseCredentials) -> IndexMap<String, String> {
    let pairs: Vec<(&str, &str)> = match kind {
        ServiceKind::Mysql => vec![
            ("MYSQL_ROOT_PASSWORD", credentials.root_password.as_str()),
            ("MYSQL_DATABASE", credentials.database.as_str()),
            ("MYSQL_USER", credentials.user.as_str()),
            ("MYSQL_PASSWORD", credentials.password.as_str()),
        ],
        ServiceKind::Mariadb => vec![
            ("MARIADB_ROOT_PASSWORD", credentials.root_password.as_str()),
            ("MARIADB_DATABASE", credentials.database.as_str()),
            ("MARIADB_USER", credentials.user.as_str()),
            ("MARIADB_PASSWORD", credentials.password.as_str()),
        ],
        ServiceKind::Pgsql => vec![
            ("POSTGRES_DB", credentials.database.as_str()),
            ("POSTGRES_USER", credentials.user.as_str()),
            ("POSTGRES_PASSWORD", credentials.password.as_str()),
        ],
        ServiceKind::Redis | ServiceKind::Nginx => Vec::new(),
    };
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl DockerServiceRegistrar for DatabaseRegistrar {
    fn name(&self) -> &'static str {
        "database"
    }

    fn supports(&self, container: &Container) -> bool {
        container
            .as_service()
            .map(|service| service.kind.is_database())
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
        let version = service.docker_version.as_deref().unwrap_or("latest");
        let credentials = DatabaseCredentials::for_service(project, service);
        let volume_name = format!("{}-{}-{}-data", project.client, project.project, name).to_lowercase();

        let stanza = ServiceStanza {
            image: Some(format!("{}:{}", service.kind.image(), version)),
            container_name: Some(tag_name(
                &project.client,
                &project.project,
                name,
                project.environment,
            )),
            networks: vec![DEFAULT_NETWORK_KEY.to_string()],
            environment: credentials_env(service.kind, &credentials),
            ..ServiceStanza::default()
        };

        let mut document = document
            .add_docker_service(name, stanza)
            .expose_ports(
                name,
                service.kind.default_ports().iter().map(|port| port.to_string()),
            );
        if let Some(data_path) = service.kind.data_path() {
            document = document
                .add_volume(name, &format!("{}:{}", volume_name, data_path))
                .set_global_volume_compose_data(&volume_name, VolumeDefinition::named(&volume_name));
        }
        Ok(document)
    }
}
