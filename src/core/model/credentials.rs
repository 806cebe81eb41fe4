use crate::core::model::container::{ServiceContainer, ServiceKind};
use crate::core::model::project::Project;

const DEFAULT_USER: &str = "launcher";
const DEFAULT_PASSWORD: &str = "launcher";
const ROOT_PASSWORD: &str = "root";

/// Local credentials shared by a database service and the applications using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub root_password: String,
}

impl DatabaseCredentials {
    pub fn for_service(project: &Project, service: &ServiceContainer) -> Self {
        Self {
            host: service.docker_service_name.clone(),
            port: service.kind.default_ports().first().copied().unwrap_or_default(),
            database: project.project.to_lowercase().replace(['-', ' '], "_"),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            root_password: ROOT_PASSWORD.to_string(),
        }
    }

    /// Connection URL in the form expected by Doctrine and most Node ORMs.
    pub fn url(&self, service: &ServiceContainer) -> Option<String> {
        let version = service.docker_version.as_deref().unwrap_or("");
        match service.kind {
            ServiceKind::Mysql => Some(format!(
                "mysql://{}:{}@{}:{}/{}?serverVersion={}&charset=utf8mb4",
                self.user, self.password, self.host, self.port, self.database, version
            )),
            ServiceKind::Mariadb => Some(format!(
                "mysql://{}:{}@{}:{}/{}?serverVersion=mariadb-{}&charset=utf8mb4",
                self.user, self.password, self.host, self.port, self.database, version
            )),
            ServiceKind::Pgsql => Some(format!(
                "postgresql://{}:{}@{}:{}/{}?serverVersion={}&charset=utf8",
                self.user, self.password, self.host, self.port, self.database, version
            )),
            ServiceKind::Redis => Some(format!("redis://{}:{}", self.host, self.port)),
            ServiceKind::Nginx => None,
        }
    }
}
