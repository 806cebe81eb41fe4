use crate::core::config::{ConfigLoader, LauncherConfig};
use crate::core::events::{ChannelPublisher, EventPublisher, EventSink, HttpSink, TracingSink};
use crate::core::orchestrator::Launcher;
use crate::core::process::TokioProcessRunner;
use crate::core::store::JsonEnvironmentStore;
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Runtime wiring shared by the project commands.
pub struct CommandContext {
    pub config: LauncherConfig,
    pub store: Arc<JsonEnvironmentStore>,
    pub launcher: Launcher,
    publisher: Arc<ChannelPublisher>,
}

impl CommandContext {
    /// Load configuration and assemble the launcher with the process runner and event sinks.
    pub fn build(config_file: Option<&Path>) -> Result<Self> {
        let config = ConfigLoader::load(config_file)?;

        let mut sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(TracingSink)];
        if let Some(hub_url) = &config.events.hub_url {
            sinks.push(Arc::new(HttpSink::new(hub_url.clone(), config.events.topic.clone())));
        }
        let publisher = Arc::new(ChannelPublisher::spawn(config.events.queue_size, sinks));
        let runner = TokioProcessRunner::new(publisher.clone() as Arc<dyn EventPublisher>)
            .with_idle_timeout(config.process.idle_timeout);
        let store = Arc::new(JsonEnvironmentStore::new(config.projects_dir.clone()));

        let launcher = Launcher::new(
            config.clone(),
            store.clone(),
            Arc::new(runner),
            publisher.clone(),
        );
        tracing::debug!(projects_dir = %config.projects_dir.display(), "command context ready");
        Ok(Self {
            config,
            store,
            launcher,
            publisher,
        })
    }

    /// Flush queued progress events before the process exits.
    pub async fn finish(self) {
        self.publisher.close().await;
    }
}
