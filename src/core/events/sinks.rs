use crate::core::events::{EventSeverity, ProgressEvent};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const HTTP_SINK_TIMEOUT: Duration = Duration::from_secs(3);

/// Transport receiving events from the background consumer.
#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, event: &ProgressEvent) -> Result<(), SinkError>;
}

/// Mirrors progress events into the tracing pipeline.
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn deliver(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        let error = event.error.as_deref().unwrap_or("");
        match event.severity {
            EventSeverity::Debug => tracing::debug!(kind = ?event.kind, "{}", event.message),
            EventSeverity::Info | EventSeverity::Success => {
                tracing::info!(kind = ?event.kind, severity = ?event.severity, "{}", event.message)
            }
            EventSeverity::Warning => tracing::warn!(kind = ?event.kind, error, "{}", event.message),
            EventSeverity::Error => tracing::error!(kind = ?event.kind, error, "{}", event.message),
        }
        Ok(())
    }
}

/// Posts every event as JSON to a hub endpoint.
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: Url,
    topic: String,
}

impl HttpSink {
    pub fn new(endpoint: Url, topic: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventSink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn deliver(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        let payload = serde_json::json!({
            "topic": self.topic,
            "event": event,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .timeout(HTTP_SINK_TIMEOUT)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SinkError::Server(format!(
                "hub returned status: {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Error types for event delivery.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Delivery error: {0}")]
    Delivery(String),
}
