//! Progress events emitted while orchestrating a project.

pub mod publisher;
pub mod sinks;

pub use publisher::{ChannelPublisher, EventPublisher, MemoryPublisher, NullPublisher};
pub use sinks::{EventSink, HttpSink, SinkError, TracingSink};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity attached to a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// Optional classification of the event origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Line of output from an external process.
    Log,
    /// Start or end of a provisioning step.
    Step,
    /// Final line of a lifecycle operation.
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub message: String,
    pub severity: EventSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>, severity: EventSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
            kind: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, EventSeverity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, EventSeverity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, EventSeverity::Warning)
    }

    pub fn error(message: impl Into<String>, error: impl Into<String>) -> Self {
        let mut event = Self::new(message, EventSeverity::Error);
        event.error = Some(error.into());
        event
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
