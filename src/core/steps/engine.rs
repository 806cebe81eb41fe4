use crate::core::events::{EventKind, ProgressEvent};
use crate::core::steps::{ApplicationStep, StepContext, StepHandler};
use crate::core::types::DockerAction;
use std::sync::Arc;

/// Builder used to register handlers before the engine is frozen.
#[derive(Default)]
pub struct StepEngineBuilder {
    handlers: Vec<Arc<dyn StepHandler>>,
}

impl StepEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: StepHandler>(&mut self, handler: T) -> &mut Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Freeze the registry sorted by `(priority, registration index)`.
    pub fn build(self) -> StepEngine {
        let mut indexed: Vec<(usize, Arc<dyn StepHandler>)> =
            self.handlers.into_iter().enumerate().collect();
        indexed.sort_by_key(|(index, handler)| (handler.priority(), *index));
        StepEngine {
            handlers: Arc::new(indexed.into_iter().map(|(_, handler)| handler).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: ApplicationStep,
    pub error: Option<String>,
}

/// Result of running the plan of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRunReport {
    pub outcomes: Vec<StepOutcome>,
}

impl StepRunReport {
    pub fn executed(&self) -> Vec<ApplicationStep> {
        self.outcomes.iter().map(|outcome| outcome.step).collect()
    }

    pub fn failed(&self) -> Vec<&StepOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.error.is_some())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.error.is_none())
    }
}

/// Immutable, ordered handler registry.
#[derive(Clone)]
pub struct StepEngine {
    handlers: Arc<Vec<Arc<dyn StepHandler>>>,
}

impl StepEngine {
    pub fn builder() -> StepEngineBuilder {
        StepEngineBuilder::new()
    }

    /// Steps in execution order, for diagnostics.
    pub fn ordered_steps(&self) -> Vec<ApplicationStep> {
        self.handlers.iter().map(|handler| handler.step()).collect()
    }

    /// Run every handler supporting `(steps, action)` once, in registry order.
    ///
    /// A failing handler is reported and the remaining ones still run.
    pub async fn run(
        &self,
        steps: &[ApplicationStep],
        action: DockerAction,
        ctx: &StepContext<'_>,
    ) -> StepRunReport {
        let service = ctx.container.docker_service_name.as_str();
        let publisher = ctx.services.publisher.as_ref();
        let mut report = StepRunReport::default();

        for handler in self.handlers.iter() {
            if !handler.supports(steps, action) {
                continue;
            }
            let step = handler.step();
            publisher.publish(
                ProgressEvent::info(format!("[{}] {}: start", service, step)).with_kind(EventKind::Step),
            );

            match handler.execute(ctx).await {
                Ok(()) => {
                    tracing::info!(%step, %action, service, "step completed");
                    publisher.publish(
                        ProgressEvent::success(format!("[{}] {}: success", service, step))
                            .with_kind(EventKind::Step),
                    );
                    report.outcomes.push(StepOutcome { step, error: None });
                }
                Err(err) => {
                    tracing::error!(%step, %action, service, error = %err, "step failed");
                    publisher.publish(
                        ProgressEvent::error(format!("[{}] {}: error", service, step), err.to_string())
                            .with_kind(EventKind::Step),
                    );
                    report.outcomes.push(StepOutcome {
                        step,
                        error: Some(err.to_string()),
                    });
                }
            }
        }
        report
    }
}
