//! Central event management and broadcasting

use tokio::sync::broadcast;

use crate::events::{EngineEvent, FeedbackEvent, StageEvent, ValidationEvent};

/// Central event manager that coordinates all engine events
pub struct EventManager {
    event_tx: broadcast::Sender<EngineEvent>,
}

impl EventManager {
    /// Create a new event manager with a broadcast channel
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1000);
        Self { event_tx }
    }

    /// Subscribe to all engine events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a stage event
    pub fn emit_stage(&self, event: StageEvent) {
        tracing::debug!(stage = %event.stage, "broadcasting stage event");
        let _ = self.event_tx.send(EngineEvent::Stage(event));
    }

    /// Emit a validation event
    pub fn emit_validation(&self, event: ValidationEvent) {
        let _ = self.event_tx.send(EngineEvent::Validation(event));
    }

    /// Emit a feedback event
    pub fn emit_feedback(&self, event: FeedbackEvent) {
        let _ = self.event_tx.send(EngineEvent::Feedback(event));
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}
