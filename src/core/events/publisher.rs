use crate::core::events::sinks::EventSink;
use crate::core::events::ProgressEvent;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Fire-and-forget destination for progress events.
///
/// Publishing never fails from the caller's point of view: implementations log and
/// drop events they cannot deliver.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: ProgressEvent);
}

/// Publisher backed by a bounded queue drained by a background task.
pub struct ChannelPublisher {
    sender: Mutex<Option<mpsc::Sender<ProgressEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ChannelPublisher {
    /// Spawn the consumer task. Must be called from within a tokio runtime.
    pub fn spawn(capacity: usize, sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(async move {
            Self::consumer_loop(sinks, receiver).await;
        });
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Stop accepting events and wait until queued ones were handed to the sinks.
    pub async fn close(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
        let worker = self.worker.lock().ok().and_then(|mut guard| guard.take());
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                tracing::warn!(error = %err, "event consumer task ended abnormally");
            }
        }
    }

    async fn consumer_loop(
        sinks: Vec<Arc<dyn EventSink>>,
        mut receiver: mpsc::Receiver<ProgressEvent>,
    ) {
        while let Some(event) = receiver.recv().await {
            for sink in &sinks {
                if let Err(err) = sink.deliver(&event).await {
                    tracing::warn!(
                        sink = sink.name(),
                        severity = ?event.severity,
                        error = %err,
                        "failed to deliver progress event"
                    );
                }
            }
        }
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, event: ProgressEvent) {
        let guard = match self.sender.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("event publisher lock poisoned; dropping event");
                return;
            }
        };
        let Some(sender) = guard.as_ref() else {
            tracing::debug!(message = %event.message, "event publisher closed; dropping event");
            return;
        };
        if let Err(err) = sender.try_send(event) {
            tracing::warn!(error = %err, "progress event queue rejected event");
        }
    }
}

/// Keeps every event in memory; used by embedders and tests to inspect progress.
#[derive(Default)]
pub struct MemoryPublisher {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.message)
            .collect()
    }
}

impl EventPublisher for MemoryPublisher {
    fn publish(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Discards every event.
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _event: ProgressEvent) {}
}
