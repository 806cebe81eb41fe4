use crate::core::error::AppError;
use crate::core::model::framework::Framework;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Structural family of a container, used to decide build-vs-skip behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    ProjectContainer,
    ServiceContainer,
}

/// Language runtime of a project container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectKind {
    Php,
    Node,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 2] = [ProjectKind::Php, ProjectKind::Node];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Php => "PHP",
            ProjectKind::Node => "NODE",
        }
    }

    /// Lowercase identifier used in file names, base services and socle tags.
    pub fn slug(&self) -> &'static str {
        match self {
            ProjectKind::Php => "php",
            ProjectKind::Node => "node",
        }
    }

    pub fn support(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    pub fn parse(name: &str) -> Option<ProjectKind> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
    }

    pub fn version_supported(&self) -> &'static [&'static str] {
        match self {
            ProjectKind::Php => &["8.4", "8.3", "8.2", "8.1", "7.4"],
            ProjectKind::Node => &["22", "20", "18"],
        }
    }

    pub fn framework_supported(&self) -> &'static [crate::core::model::FrameworkName] {
        use crate::core::model::FrameworkName;
        match self {
            ProjectKind::Php => &[
                FrameworkName::Php,
                FrameworkName::Symfony,
                FrameworkName::Laravel,
            ],
            ProjectKind::Node => &[
                FrameworkName::Node,
                FrameworkName::Next,
                FrameworkName::Nest,
                FrameworkName::React,
            ],
        }
    }

    pub fn extension_supported(&self) -> &'static [&'static str] {
        match self {
            ProjectKind::Php => &[
                "amqp", "apcu", "bcmath", "exif", "gd", "imagick", "intl", "opcache",
                "pcntl", "pdo_mysql", "pdo_pgsql", "redis", "soap", "sockets", "xdebug",
                "xsl", "zip",
            ],
            ProjectKind::Node => &[],
        }
    }

    /// Port the runtime listens on when no web server fronts it.
    pub fn default_port(&self) -> u16 {
        match self {
            ProjectKind::Php => 8000,
            ProjectKind::Node => 3000,
        }
    }

    pub fn working_dir(&self) -> &'static str {
        match self {
            ProjectKind::Php => "/var/www/html",
            ProjectKind::Node => "/usr/src/app",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceKind {
    Mysql,
    Mariadb,
    Pgsql,
    Redis,
    Nginx,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Mysql,
        ServiceKind::Mariadb,
        ServiceKind::Pgsql,
        ServiceKind::Redis,
        ServiceKind::Nginx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Mysql => "MYSQL",
            ServiceKind::Mariadb => "MARIADB",
            ServiceKind::Pgsql => "PGSQL",
            ServiceKind::Redis => "REDIS",
            ServiceKind::Nginx => "NGINX",
        }
    }

    pub fn support(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    pub fn parse(name: &str) -> Option<ServiceKind> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
    }

    pub fn version_supported(&self) -> &'static [&'static str] {
        match self {
            ServiceKind::Mysql => &["8.4", "8.0", "5.7"],
            ServiceKind::Mariadb => &["11.4", "10.11", "10.6"],
            ServiceKind::Pgsql => &["17", "16", "15", "14"],
            ServiceKind::Redis => &["7.4", "7.2", "6.2"],
            ServiceKind::Nginx => &["1.27", "1.26", "1.25"],
        }
    }

    /// Published image the service runs from.
    pub fn image(&self) -> &'static str {
        match self {
            ServiceKind::Mysql => "mysql",
            ServiceKind::Mariadb => "mariadb",
            ServiceKind::Pgsql => "postgres",
            ServiceKind::Redis => "redis",
            ServiceKind::Nginx => "nginx",
        }
    }

    /// Services other containers may declare as a data storage.
    pub fn is_database(&self) -> bool {
        !matches!(self, ServiceKind::Nginx)
    }

    pub fn default_ports(&self) -> &'static [u16] {
        match self {
            ServiceKind::Mysql | ServiceKind::Mariadb => &[3306],
            ServiceKind::Pgsql => &[5432],
            ServiceKind::Redis => &[6379],
            ServiceKind::Nginx => &[80],
        }
    }

    pub fn data_path(&self) -> Option<&'static str> {
        match self {
            ServiceKind::Mysql | ServiceKind::Mariadb => Some("/var/lib/mysql"),
            ServiceKind::Pgsql => Some("/var/lib/postgresql/data"),
            ServiceKind::Redis => Some("/data"),
            ServiceKind::Nginx => None,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding of a project container to a web server service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebServerBinding {
    /// Docker service name of the web server container.
    pub service: String,
    /// Port the web server listens on for this project.
    pub port: u16,
}

/// Source repository cloned into the container folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

/// Language runtime scaffolded and built by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContainer {
    pub id: Uuid,
    pub kind: ProjectKind,
    pub folder_name: String,
    pub docker_service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_version: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_server: Option<WebServerBinding>,
    #[serde(default)]
    pub data_storages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<GitSource>,
}

impl ProjectContainer {
    pub fn new(kind: ProjectKind, folder_name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            folder_name: folder_name.to_string(),
            docker_service_name: folder_name.to_string(),
            docker_version: None,
            extensions: Vec::new(),
            framework: None,
            web_server: None,
            data_storages: Vec::new(),
            url_service: None,
            repository: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.docker_version = Some(version.to_string());
        self
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url_service = Some(url.to_string());
        self
    }

    pub fn with_web_server(mut self, service: &str, port: u16) -> Self {
        self.web_server = Some(WebServerBinding {
            service: service.to_string(),
            port,
        });
        self
    }

    pub fn with_data_storage(mut self, service: &str) -> Self {
        self.data_storages.push(service.to_string());
        self
    }

    pub fn with_repository(mut self, url: &str, branch: &str) -> Self {
        self.repository = Some(GitSource {
            url: url.to_string(),
            branch: branch.to_string(),
        });
        self
    }

    /// Port HTTP requests for the application arrive on: the listen port of the
    /// bound web server, or the runtime's own server port.
    pub fn http_port(&self) -> u16 {
        self.web_server
            .as_ref()
            .map(|binding| binding.port)
            .unwrap_or_else(|| self.kind.default_port())
    }

    /// Catalog entry matching the declared docker version, if any.
    pub fn version_service_enum(&self) -> Option<&'static str> {
        catalog_entry(self.kind.version_supported(), self.docker_version.as_deref())
    }

    /// Extensions required by the container and its framework, deduplicated in order.
    pub fn all_extensions(&self) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        let framework_extensions = self
            .framework
            .iter()
            .flat_map(|framework| framework.extensions.iter());
        for extension in self.extensions.iter().chain(framework_extensions) {
            if !merged.contains(extension) {
                merged.push(extension.clone());
            }
        }
        merged
    }
}

/// Auxiliary service running from a published image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContainer {
    pub id: Uuid,
    pub kind: ServiceKind,
    pub folder_name: String,
    pub docker_service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_service: Option<String>,
}

impl ServiceContainer {
    pub fn new(kind: ServiceKind, service_name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            folder_name: service_name.to_string(),
            docker_service_name: service_name.to_string(),
            docker_version: None,
            url_service: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.docker_version = Some(version.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url_service = Some(url.to_string());
        self
    }

    pub fn version_service_enum(&self) -> Option<&'static str> {
        catalog_entry(self.kind.version_supported(), self.docker_version.as_deref())
    }
}

/// Container of a project: a runtime to build or a service to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Container {
    Project(ProjectContainer),
    Service(ServiceContainer),
}

impl Container {
    pub fn id(&self) -> Uuid {
        match self {
            Container::Project(container) => container.id,
            Container::Service(container) => container.id,
        }
    }

    pub fn folder_name(&self) -> &str {
        match self {
            Container::Project(container) => &container.folder_name,
            Container::Service(container) => &container.folder_name,
        }
    }

    pub fn docker_service_name(&self) -> &str {
        match self {
            Container::Project(container) => &container.docker_service_name,
            Container::Service(container) => &container.docker_service_name,
        }
    }

    pub fn docker_version(&self) -> Option<&str> {
        match self {
            Container::Project(container) => container.docker_version.as_deref(),
            Container::Service(container) => container.docker_version.as_deref(),
        }
    }

    pub fn url_service(&self) -> Option<&str> {
        match self {
            Container::Project(container) => container.url_service.as_deref(),
            Container::Service(container) => container.url_service.as_deref(),
        }
    }

    pub fn form_type(&self) -> FormType {
        match self {
            Container::Project(_) => FormType::ProjectContainer,
            Container::Service(_) => FormType::ServiceContainer,
        }
    }

    /// Name of the concrete category (`PHP`, `MYSQL`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Container::Project(container) => container.kind.as_str(),
            Container::Service(container) => container.kind.as_str(),
        }
    }

    pub fn version_supported(&self) -> &'static [&'static str] {
        match self {
            Container::Project(container) => container.kind.version_supported(),
            Container::Service(container) => container.kind.version_supported(),
        }
    }

    pub fn version_service_enum(&self) -> Option<&'static str> {
        match self {
            Container::Project(container) => container.version_service_enum(),
            Container::Service(container) => container.version_service_enum(),
        }
    }

    pub fn as_project(&self) -> Option<&ProjectContainer> {
        match self {
            Container::Project(container) => Some(container),
            Container::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceContainer> {
        match self {
            Container::Service(container) => Some(container),
            Container::Project(_) => None,
        }
    }

    /// Check the declared version and framework against the container catalogs.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(version) = self.docker_version() {
            if self.version_service_enum().is_none() {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!(
                        "{} version '{}' is not supported for service '{}' (supported: {})",
                        self.type_name(),
                        version,
                        self.docker_service_name(),
                        self.version_supported().join(", ")
                    ),
                )
                .with_code("MODEL-001"));
            }
        }

        if let Container::Project(container) = self {
            if let Some(framework) = &container.framework {
                if framework.name.language() != container.kind {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "framework {} cannot run on a {} container",
                            framework.name, container.kind
                        ),
                    )
                    .with_code("MODEL-002"));
                }
            }
        }
        Ok(())
    }
}

impl From<ProjectContainer> for Container {
    fn from(container: ProjectContainer) -> Self {
        Container::Project(container)
    }
}

impl From<ServiceContainer> for Container {
    fn from(container: ServiceContainer) -> Self {
        Container::Service(container)
    }
}

fn catalog_entry(
    catalog: &'static [&'static str],
    version: Option<&str>,
) -> Option<&'static str> {
    let version = version?.trim();
    catalog.iter().copied().find(|entry| *entry == version)
}
