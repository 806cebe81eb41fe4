#![allow(dead_code)]

use async_trait::async_trait;
use launcher::core::config::LauncherConfig;
use launcher::core::error::AppError;
use launcher::core::events::MemoryPublisher;
use launcher::core::model::{
    Framework, FrameworkName, Project, ProjectContainer, ProjectKind, ServiceContainer, ServiceKind,
};
use launcher::core::orchestrator::Launcher;
use launcher::core::process::{ProcessOutput, ProcessRequest, ProcessRunner};
use launcher::core::store::{EnvironmentStore, JsonEnvironmentStore};
use launcher::core::types::Environment;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Records every request and answers from scripted rules.
///
/// Rules match on the rendered command line prefix; the most recent matching rule
/// wins. Unmatched commands exit 0 with no output.
#[derive(Default)]
pub struct MockProcessRunner {
    requests: Mutex<Vec<ProcessRequest>>,
    rules: Mutex<Vec<(String, ProcessOutput)>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prefix: &str, exit_code: i32, stdout: &[&str]) -> &Self {
        self.rules.lock().unwrap().push((
            prefix.to_string(),
            ProcessOutput {
                exit_code,
                stdout: stdout.iter().map(|line| line.to_string()).collect(),
            },
        ));
        self
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(ProcessRequest::command_line)
            .collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let line = request.command_line();
        let rules = self.rules.lock().unwrap();
        Ok(rules
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}

/// acme/shop: a Symfony API behind traefik with a MySQL database, plus a Next front.
pub fn sample_project() -> Project {
    let mut symfony = Framework::new(FrameworkName::Symfony);
    symfony.version = Some("7.2".to_string());
    let mut next = Framework::new(FrameworkName::Next);
    next.version = Some("15".to_string());

    Project::new("acme", "shop", Environment::Dev, "traefik")
        .with_container(
            ProjectContainer::new(ProjectKind::Php, "api")
                .with_version("8.3")
                .with_framework(symfony)
                .with_url("api.shop.localhost")
                .with_data_storage("database"),
        )
        .with_container(
            ProjectContainer::new(ProjectKind::Node, "front")
                .with_version("22")
                .with_framework(next)
                .with_url("shop.localhost"),
        )
        .with_container(ServiceContainer::new(ServiceKind::Mysql, "database").with_version("8.0"))
}

/// Launcher over a temporary projects dir with the sample project stored.
pub struct Harness {
    pub dir: TempDir,
    pub runner: Arc<MockProcessRunner>,
    pub publisher: Arc<MemoryPublisher>,
    pub store: Arc<JsonEnvironmentStore>,
    pub launcher: Launcher,
}

impl Harness {
    pub fn new(project: &Project) -> Self {
        Self::with_config(project, |_| {})
    }

    pub fn with_config(project: &Project, configure: impl FnOnce(&mut LauncherConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = LauncherConfig::default();
        config.projects_dir = dir.path().to_path_buf();
        config.readiness.timeout = Duration::from_secs(10);
        config.readiness.interval = Duration::from_secs(5);
        configure(&mut config);

        let store = Arc::new(JsonEnvironmentStore::new(dir.path()));
        store.save(project).unwrap();
        let runner = Arc::new(MockProcessRunner::new());
        let publisher = Arc::new(MemoryPublisher::new());
        let launcher = Launcher::new(config, store.clone(), runner.clone(), publisher.clone());
        Self {
            dir,
            runner,
            publisher,
            store,
            launcher,
        }
    }

    pub fn project_dir(&self, project: &Project) -> std::path::PathBuf {
        self.store.project_dir(&project.client, &project.project)
    }
}
