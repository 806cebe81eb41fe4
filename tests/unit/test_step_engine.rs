#[path = "../common/mod.rs"]
mod common;

use async_trait::async_trait;
use launcher::core::config::ImagesConfig;
use launcher::core::env::{EnvModifierChain, GeneratorRegistry};
use launcher::core::error::AppError;
use launcher::core::events::{EventKind, MemoryPublisher};
use launcher::core::steps::handlers::default_engine;
use launcher::core::steps::{
    ApplicationStep, StepContext, StepEngine, StepHandler, StepServices,
};
use launcher::core::types::{DockerAction, ErrorCategory};
use launcher::core::workspace::ProjectPaths;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct Recording {
    label: &'static str,
    step: ApplicationStep,
    priority: i32,
    fail: bool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl StepHandler for Recording {
    fn step(&self) -> ApplicationStep {
        self.step
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn execute(&self, _ctx: &StepContext<'_>) -> Result<(), AppError> {
        self.log.lock().unwrap().push(self.label);
        if self.fail {
            return Err(AppError::new(ErrorCategory::ProcessExecutionError, "boom"));
        }
        Ok(())
    }
}

fn services(publisher: Arc<MemoryPublisher>) -> StepServices {
    StepServices {
        runner: Arc::new(common::MockProcessRunner::new()),
        publisher,
        generators: GeneratorRegistry::with_defaults(),
        modifiers: Arc::new(EnvModifierChain::default()),
        images: ImagesConfig::default(),
    }
}

fn handler(
    label: &'static str,
    step: ApplicationStep,
    priority: i32,
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> Recording {
    Recording {
        label,
        step,
        priority,
        fail: false,
        log: log.clone(),
    }
}

#[tokio::test]
async fn handlers_run_by_priority_then_registration() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut builder = StepEngine::builder();
    builder
        .register(handler("A", ApplicationStep::Dockerfile, 5, &log))
        .register(handler("B", ApplicationStep::EnvFile, 1, &log))
        .register(handler("C", ApplicationStep::AccessRight, 3, &log))
        .register(handler("D", ApplicationStep::EnvFileApplication, 3, &log));
    let engine = builder.build();

    let dir = TempDir::new().unwrap();
    let project = common::sample_project();
    let container = project.project_containers().next().unwrap();
    let paths = ProjectPaths::new(dir.path());
    let publisher = Arc::new(MemoryPublisher::new());
    let services = services(publisher.clone());
    let ctx = StepContext {
        project: &project,
        container,
        paths: &paths,
        services: &services,
    };

    let plan = [
        ApplicationStep::Dockerfile,
        ApplicationStep::EnvFile,
        ApplicationStep::AccessRight,
        ApplicationStep::EnvFileApplication,
    ];
    let report = engine.run(&plan, DockerAction::Build, &ctx).await;

    assert_eq!(*log.lock().unwrap(), vec!["B", "C", "D", "A"]);
    assert!(report.is_success());
    let step_events = publisher
        .events()
        .into_iter()
        .filter(|event| event.kind == Some(EventKind::Step))
        .count();
    assert_eq!(step_events, 8);
}

#[tokio::test]
async fn steps_outside_the_plan_or_action_are_skipped() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut builder = StepEngine::builder();
    builder
        .register(handler("gitignore", ApplicationStep::InitGitignore, 1, &log))
        .register(handler("dockerfile", ApplicationStep::Dockerfile, 2, &log));
    let engine = builder.build();

    let dir = TempDir::new().unwrap();
    let project = common::sample_project();
    let container = project.project_containers().next().unwrap();
    let paths = ProjectPaths::new(dir.path());
    let services = services(Arc::new(MemoryPublisher::new()));
    let ctx = StepContext {
        project: &project,
        container,
        paths: &paths,
        services: &services,
    };

    engine
        .run(&[ApplicationStep::Dockerfile], DockerAction::Build, &ctx)
        .await;
    engine
        .run(&[ApplicationStep::InitGitignore], DockerAction::Start, &ctx)
        .await;
    assert_eq!(*log.lock().unwrap(), vec!["dockerfile"]);
}

#[tokio::test]
async fn failing_step_is_reported_and_the_rest_still_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut failing = handler("first", ApplicationStep::EnvFile, 1, &log);
    failing.fail = true;
    let mut builder = StepEngine::builder();
    builder
        .register(failing)
        .register(handler("second", ApplicationStep::AccessRight, 2, &log));
    let engine = builder.build();

    let dir = TempDir::new().unwrap();
    let project = common::sample_project();
    let container = project.project_containers().next().unwrap();
    let paths = ProjectPaths::new(dir.path());
    let services = services(Arc::new(MemoryPublisher::new()));
    let ctx = StepContext {
        project: &project,
        container,
        paths: &paths,
        services: &services,
    };

    let report = engine
        .run(
            &[ApplicationStep::EnvFile, ApplicationStep::AccessRight],
            DockerAction::Build,
            &ctx,
        )
        .await;
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    assert!(!report.is_success());
    assert_eq!(report.failed().len(), 1);
    assert_eq!(report.failed()[0].step, ApplicationStep::EnvFile);
}

#[test]
fn default_engine_orders_provisioning_steps() {
    let steps = default_engine().ordered_steps();
    let position = |step| steps.iter().position(|candidate| *candidate == step).unwrap();
    assert!(position(ApplicationStep::InitGitignore) < position(ApplicationStep::GitClone));
    assert!(position(ApplicationStep::SymfonyCreate) < position(ApplicationStep::ComposerInit));
    assert!(position(ApplicationStep::Dockerfile) < position(ApplicationStep::EnvFile));
    assert!(position(ApplicationStep::PhpQuality) < position(ApplicationStep::EnvFileApplication));
    assert_eq!(steps.len(), 17);
}
