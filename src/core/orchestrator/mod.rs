#![allow(clippy::result_large_err)]

//! Lifecycle orchestrators sequencing registrars, steps and docker commands for a project.

pub mod build;
pub mod delete;
pub mod generate;
pub mod manifest;
pub mod remove;
pub mod start;
pub mod stop;

pub use manifest::render_makefile;
pub use start::StartOptions;

use crate::core::config::LauncherConfig;
use crate::core::env::{EnvModifierChain, GeneratorRegistry};
use crate::core::error::AppError;
use crate::core::events::{EventKind, EventPublisher, ProgressEvent};
use crate::core::model::{Project, ProjectContainer};
use crate::core::process::ProcessRunner;
use crate::core::registrar::RegistrarRegistry;
use crate::core::steps::handlers::default_engine;
use crate::core::steps::{StepContext, StepEngine, StepRunReport, StepServices};
use crate::core::store::EnvironmentStore;
use crate::core::strategy::StrategySelector;
use crate::core::types::{DockerAction, ErrorCategory};
use crate::core::workspace::ProjectPaths;
use std::fmt;
use std::sync::Arc;

/// Lifecycle operation a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Build,
    Start,
    Stop,
    Delete,
    RemoveService,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Generate => "generate",
            Operation::Build => "build",
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Delete => "delete",
            Operation::RemoveService => "remove-service",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFailure {
    pub service: String,
    pub error: String,
}

/// Outcome of a best-effort lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub operation: Operation,
    pub total: usize,
    pub succeeded: Vec<String>,
    pub failures: Vec<ContainerFailure>,
}

impl LifecycleReport {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            total: 0,
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn success(&mut self, service: &str) {
        self.succeeded.push(service.to_string());
    }

    pub fn failure(&mut self, service: &str, error: impl fmt::Display) {
        self.failures.push(ContainerFailure {
            service: service.to_string(),
            error: error.to_string(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `built 2/3` style summary.
    pub fn summary(&self) -> String {
        let verb = match self.operation {
            Operation::Generate => "generated",
            Operation::Build => "built",
            Operation::Start => "started",
            Operation::Stop => "stopped",
            Operation::Delete => "deleted",
            Operation::RemoveService => "removed",
        };
        format!("{} {}/{}", verb, self.succeeded.len(), self.total)
    }
}

/// Composition root of the engine: configuration, collaborators and registries.
pub struct Launcher {
    config: LauncherConfig,
    store: Arc<dyn EnvironmentStore>,
    services: StepServices,
    registrars: RegistrarRegistry,
    steps: StepEngine,
    strategies: StrategySelector,
}

impl Launcher {
    pub fn new(
        config: LauncherConfig,
        store: Arc<dyn EnvironmentStore>,
        runner: Arc<dyn ProcessRunner>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let services = StepServices {
            runner,
            publisher,
            generators: GeneratorRegistry::with_defaults(),
            modifiers: Arc::new(EnvModifierChain::default()),
            images: config.images.clone(),
        };
        Self {
            config,
            store,
            services,
            registrars: RegistrarRegistry::with_defaults(),
            steps: default_engine(),
            strategies: StrategySelector::with_defaults(),
        }
    }

    pub fn with_step_engine(mut self, steps: StepEngine) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_strategies(mut self, strategies: StrategySelector) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn EnvironmentStore {
        self.store.as_ref()
    }

    fn runner(&self) -> &dyn ProcessRunner {
        self.services.runner.as_ref()
    }

    fn publish(&self, event: ProgressEvent) {
        self.services.publisher.publish(event);
    }

    /// Descriptor of `(client, project)`, loaded fresh from the store.
    /// Stored descriptor of `client/project`, with the configured traefik
    /// network filled in when the descriptor names none.
    pub fn load_project(&self, client: &str, project: &str) -> Result<Project, AppError> {
        let mut loaded = self.store.load(client, project)?.ok_or_else(|| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("project {}/{} is not registered", client, project),
            )
            .with_code("LIFE-001")
            .with_context("client", client)
            .with_context("project", project)
        })?;
        if loaded.network.trim().is_empty() {
            loaded.network = self.config.traefik_network.clone();
        }
        Ok(loaded)
    }

    pub fn paths(&self, project: &Project) -> ProjectPaths {
        ProjectPaths::new(self.store.project_dir(&project.client, &project.project))
    }

    /// Select and run the plan of one project container for `action`.
    async fn run_steps(
        &self,
        project: &Project,
        container: &ProjectContainer,
        paths: &ProjectPaths,
        action: DockerAction,
    ) -> Result<StepRunReport, AppError> {
        let plan = self
            .strategies
            .select(&container.clone().into(), action)?;
        let ctx = StepContext {
            project,
            container,
            paths,
            services: &self.services,
        };
        Ok(self.steps.run(&plan, action, &ctx).await)
    }

    fn publish_summary(&self, project: &Project, report: &LifecycleReport) {
        let message = format!(
            "{} {}/{}: {}",
            report.operation,
            project.client,
            project.project,
            report.summary()
        );
        let event = if report.is_success() {
            ProgressEvent::success(message)
        } else {
            let failed: Vec<&str> = report.failures.iter().map(|f| f.service.as_str()).collect();
            ProgressEvent::error(message, format!("failed: {}", failed.join(", ")))
        };
        self.publish(event.with_kind(EventKind::Summary));
        tracing::info!(
            operation = %report.operation,
            client = %project.client,
            project = %project.project,
            succeeded = report.succeeded.len(),
            failed = report.failures.len(),
            total = report.total,
            "lifecycle operation finished"
        );
    }
}

/// Fold the failed steps of a run into one error message.
fn step_failures(report: &StepRunReport) -> Option<String> {
    let failed = report.failed();
    if failed.is_empty() {
        return None;
    }
    Some(
        failed
            .iter()
            .map(|outcome| {
                format!(
                    "{}: {}",
                    outcome.step,
                    outcome.error.as_deref().unwrap_or("failed")
                )
            })
            .collect::<Vec<_>>()
            .join("; "),
    )
}
