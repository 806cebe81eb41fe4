//! Chain building the `.env.niji-launcher` overlay read by the application itself.

use crate::core::env::generator::EnvVariables;
use crate::core::model::{
    DatabaseCredentials, FrameworkName, Project, ProjectContainer, ProjectKind, ServiceContainer,
    ServiceKind,
};

pub const APPLICATION_ENV_FILE: &str = ".env.niji-launcher";

/// Adjusts the application overlay for one container.
pub trait EnvModifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, container: &ProjectContainer) -> bool;

    fn modify(&self, container: &ProjectContainer, project: &Project, variables: &mut EnvVariables);
}

/// Data storages of the container resolved against the project services, in declared order.
fn data_storages<'a>(
    container: &'a ProjectContainer,
    project: &'a Project,
) -> impl Iterator<Item = &'a ServiceContainer> + 'a {
    container
        .data_storages
        .iter()
        .filter_map(move |name| project.find_database(name))
}

fn framework_name(container: &ProjectContainer) -> Option<FrameworkName> {
    container.framework.as_ref().map(|framework| framework.name)
}

pub struct ApplicationEnvironmentModifier;

impl EnvModifier for ApplicationEnvironmentModifier {
    fn name(&self) -> &'static str {
        "application_environment"
    }

    fn supports(&self, container: &ProjectContainer) -> bool {
        container.framework.is_some()
    }

    fn modify(&self, container: &ProjectContainer, _project: &Project, variables: &mut EnvVariables) {
        let Some(framework) = &container.framework else {
            return;
        };
        let key = match container.kind {
            ProjectKind::Php => "APP_ENV",
            ProjectKind::Node => "NODE_ENV",
        };
        variables.insert(key.to_string(), framework.application_environment.clone());
    }
}

/// `DATABASE_URL` for frameworks configured through a single DSN.
pub struct DatabaseUrlModifier;

impl EnvModifier for DatabaseUrlModifier {
    fn name(&self) -> &'static str {
        "database_url"
    }

    fn supports(&self, container: &ProjectContainer) -> bool {
        match framework_name(container) {
            Some(FrameworkName::Symfony) => true,
            Some(name) => name.language() == ProjectKind::Node,
            None => false,
        }
    }

    fn modify(&self, container: &ProjectContainer, project: &Project, variables: &mut EnvVariables) {
        let sql = data_storages(container, project).find(|service| service.kind != ServiceKind::Redis);
        if let Some(service) = sql {
            let credentials = DatabaseCredentials::for_service(project, service);
            if let Some(url) = credentials.url(service) {
                variables.insert("DATABASE_URL".to_string(), url);
            }
        }
    }
}

/// Laravel reads discrete `DB_*` keys instead of a DSN.
pub struct LaravelDatabaseModifier;

impl EnvModifier for LaravelDatabaseModifier {
    fn name(&self) -> &'static str {
        "laravel_database"
    }

    fn supports(&self, container: &ProjectContainer) -> bool {
        framework_name(container) == Some(FrameworkName::Laravel)
    }

    fn modify(&self, container: &ProjectContainer, project: &Project, variables: &mut EnvVariables) {
        let sql = data_storages(container, project).find(|service| service.kind != ServiceKind::Redis);
        let Some(service) = sql else {
            return;
        };
        let connection = match service.kind {
            ServiceKind::Pgsql => "pgsql",
            ServiceKind::Mariadb => "mariadb",
            _ => "mysql",
        };
        let credentials = DatabaseCredentials::for_service(project, service);
        for (key, value) in [
            ("DB_CONNECTION", connection.to_string()),
            ("DB_HOST", credentials.host),
            ("DB_PORT", credentials.port.to_string()),
            ("DB_DATABASE", credentials.database),
            ("DB_USERNAME", credentials.user),
            ("DB_PASSWORD", credentials.password),
        ] {
            variables.insert(key.to_string(), value);
        }
    }
}

pub struct RedisUrlModifier;

impl EnvModifier for RedisUrlModifier {
    fn name(&self) -> &'static str {
        "redis_url"
    }

    fn supports(&self, container: &ProjectContainer) -> bool {
        !container.data_storages.is_empty()
    }

    fn modify(&self, container: &ProjectContainer, project: &Project, variables: &mut EnvVariables) {
        let redis = data_storages(container, project).find(|service| service.kind == ServiceKind::Redis);
        if let Some(service) = redis {
            let credentials = DatabaseCredentials::for_service(project, service);
            if let Some(url) = credentials.url(service) {
                variables.insert("REDIS_URL".to_string(), url);
            }
        }
    }
}

/// Ordered list of modifiers; later modifiers overwrite keys set by earlier ones.
pub struct EnvModifierChain {
    modifiers: Vec<Box<dyn EnvModifier>>,
}

impl Default for EnvModifierChain {
    fn default() -> Self {
        Self {
            modifiers: vec![
                Box::new(ApplicationEnvironmentModifier),
                Box::new(DatabaseUrlModifier),
                Box::new(LaravelDatabaseModifier),
                Box::new(RedisUrlModifier),
            ],
        }
    }
}

impl EnvModifierChain {
    pub fn apply(&self, container: &ProjectContainer, project: &Project) -> EnvVariables {
        let mut variables = EnvVariables::new();
        for modifier in self.modifiers.iter().filter(|m| m.supports(container)) {
            tracing::trace!(modifier = modifier.name(), container = %container.docker_service_name, "applying env modifier");
            modifier.modify(container, project, &mut variables);
        }
        variables
    }
}
