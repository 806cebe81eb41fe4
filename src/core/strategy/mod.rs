#![allow(clippy::result_large_err)]

//! Selection of the step plan of a container for a lifecycle action.

use crate::core::error::AppError;
use crate::core::model::{Container, FrameworkName, ProjectKind};
use crate::core::steps::ApplicationStep;
use crate::core::types::{DockerAction, ErrorCategory};
use std::sync::Arc;

/// Ordered step plan for the containers and action it supports.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, container: &Container, action: DockerAction) -> bool;

    fn steps(&self) -> &[ApplicationStep];
}

/// Containers a plan applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTarget {
    /// Project container running the given scaffolded framework.
    Framework(FrameworkName),
    /// Project container of the given language without a scaffolded framework.
    BareRuntime(ProjectKind),
    AnyProject,
}

impl PlanTarget {
    fn matches(&self, container: &Container) -> bool {
        let Some(project) = container.as_project() else {
            return false;
        };
        let framework = project.framework.as_ref();
        match self {
            PlanTarget::Framework(name) => framework.map(|f| f.name) == Some(*name),
            PlanTarget::BareRuntime(kind) => {
                project.kind == *kind && !framework.map(|f| f.is_scaffolded()).unwrap_or(false)
            }
            PlanTarget::AnyProject => true,
        }
    }
}

/// Strategy described entirely by data.
#[derive(Debug, Clone)]
pub struct PlanStrategy {
    pub name: String,
    pub target: PlanTarget,
    pub action: DockerAction,
    pub steps: Vec<ApplicationStep>,
}

impl PlanStrategy {
    pub fn new(
        name: &str,
        target: PlanTarget,
        action: DockerAction,
        steps: impl Into<Vec<ApplicationStep>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            target,
            action,
            steps: steps.into(),
        }
    }
}

impl Strategy for PlanStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, container: &Container, action: DockerAction) -> bool {
        action == self.action && self.target.matches(container)
    }

    fn steps(&self) -> &[ApplicationStep] {
        &self.steps
    }
}

fn php_build(create: Option<ApplicationStep>) -> Vec<ApplicationStep> {
    use ApplicationStep::*;
    let mut steps = vec![InitGitignore, GitClone, InitFolderRepository];
    steps.extend(create);
    steps.extend([
        ComposerInit,
        Dockerfile,
        EnvFile,
        AccessRight,
        ConfigurationWebserver,
        PhpQuality,
        EnvFileApplication,
    ]);
    steps
}

fn node_build(create: Option<ApplicationStep>) -> Vec<ApplicationStep> {
    use ApplicationStep::*;
    let mut steps = vec![InitGitignore, GitClone, InitFolderRepository];
    steps.extend(create);
    steps.extend([
        NpmInit,
        Dockerfile,
        EnvFile,
        AccessRight,
        ConfigurationWebserver,
        EnvFileApplication,
    ]);
    steps
}

pub fn default_strategies() -> Vec<PlanStrategy> {
    use ApplicationStep::*;
    let build = DockerAction::Build;
    vec![
        PlanStrategy::new("symfony_build", PlanTarget::Framework(FrameworkName::Symfony), build, php_build(Some(SymfonyCreate))),
        PlanStrategy::new("laravel_build", PlanTarget::Framework(FrameworkName::Laravel), build, php_build(Some(LaravelCreate))),
        PlanStrategy::new("php_build", PlanTarget::BareRuntime(ProjectKind::Php), build, php_build(None)),
        PlanStrategy::new("next_build", PlanTarget::Framework(FrameworkName::Next), build, node_build(Some(NextCreate))),
        PlanStrategy::new("nest_build", PlanTarget::Framework(FrameworkName::Nest), build, node_build(Some(NestCreate))),
        PlanStrategy::new("react_build", PlanTarget::Framework(FrameworkName::React), build, node_build(Some(ReactCreate))),
        PlanStrategy::new("node_build", PlanTarget::BareRuntime(ProjectKind::Node), build, node_build(None)),
        PlanStrategy::new("project_start", PlanTarget::AnyProject, DockerAction::Start, [InstallDependencies]),
    ]
}

#[derive(Clone, Default)]
pub struct StrategySelector {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        default_strategies()
            .into_iter()
            .fold(Self::new(), |selector, strategy| selector.register(Arc::new(strategy)))
    }

    pub fn register(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Plan of `container` for `action`. No match yields an empty plan; several matches are an error.
    pub fn select(
        &self,
        container: &Container,
        action: DockerAction,
    ) -> Result<Vec<ApplicationStep>, AppError> {
        let matching: Vec<&Arc<dyn Strategy>> = self
            .strategies
            .iter()
            .filter(|strategy| strategy.supports(container, action))
            .collect();
        match matching.as_slice() {
            [] => Ok(Vec::new()),
            [strategy] => Ok(strategy.steps().to_vec()),
            many => Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!(
                    "several strategies match {} container '{}' for {}: {}",
                    container.type_name(),
                    container.docker_service_name(),
                    action,
                    many.iter().map(|strategy| strategy.name()).collect::<Vec<_>>().join(", ")
                ),
            )
            .with_code("STRATEGY-001")),
        }
    }
}
