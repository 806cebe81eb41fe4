#[path = "../common/mod.rs"]
mod common;

use launcher::core::model::{Container, FrameworkName, ProjectContainer, ProjectKind};
use launcher::core::steps::ApplicationStep;
use launcher::core::strategy::{PlanStrategy, PlanTarget, StrategySelector};
use launcher::core::types::DockerAction;
use std::sync::Arc;

fn container(service: &str) -> Container {
    common::sample_project()
        .find_container(service)
        .cloned()
        .unwrap()
}

#[test]
fn symfony_build_plan() {
    use ApplicationStep::*;
    let plan = StrategySelector::with_defaults()
        .select(&container("api"), DockerAction::Build)
        .unwrap();
    assert_eq!(
        plan,
        vec![
            InitGitignore,
            GitClone,
            InitFolderRepository,
            SymfonyCreate,
            ComposerInit,
            Dockerfile,
            EnvFile,
            AccessRight,
            ConfigurationWebserver,
            PhpQuality,
            EnvFileApplication,
        ]
    );
}

#[test]
fn next_build_plan_initializes_npm_without_php_quality() {
    let plan = StrategySelector::with_defaults()
        .select(&container("front"), DockerAction::Build)
        .unwrap();
    assert!(plan.contains(&ApplicationStep::NextCreate));
    assert!(plan.contains(&ApplicationStep::NpmInit));
    assert!(!plan.contains(&ApplicationStep::PhpQuality));
    assert!(!plan.contains(&ApplicationStep::ComposerInit));
}

#[test]
fn bare_runtime_gets_no_scaffolding() {
    let bare: Container = ProjectContainer::new(ProjectKind::Php, "legacy")
        .with_version("7.4")
        .into();
    let plan = StrategySelector::with_defaults()
        .select(&bare, DockerAction::Build)
        .unwrap();
    assert!(!plan.contains(&ApplicationStep::SymfonyCreate));
    assert!(plan.contains(&ApplicationStep::ComposerInit));
}

#[test]
fn start_plan_installs_dependencies() {
    let plan = StrategySelector::with_defaults()
        .select(&container("front"), DockerAction::Start)
        .unwrap();
    assert_eq!(plan, vec![ApplicationStep::InstallDependencies]);
}

#[test]
fn service_containers_have_no_plan() {
    let plan = StrategySelector::with_defaults()
        .select(&container("database"), DockerAction::Build)
        .unwrap();
    assert!(plan.is_empty());
}

#[test]
fn ambiguous_strategies_are_rejected() {
    let selector = StrategySelector::with_defaults().register(Arc::new(PlanStrategy::new(
        "symfony_custom",
        PlanTarget::Framework(FrameworkName::Symfony),
        DockerAction::Build,
        [ApplicationStep::Dockerfile],
    )));
    let err = selector
        .select(&container("api"), DockerAction::Build)
        .unwrap_err();
    assert_eq!(err.code, "STRATEGY-001");
    assert!(err.message.contains("symfony_build"));
    assert!(err.message.contains("symfony_custom"));
}
