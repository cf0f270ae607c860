//! EventSink implementations.

use std::sync::Mutex;

use crate::domain::SetupEvent;
use crate::ports::EventSink;

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &SetupEvent) {
        match event {
            SetupEvent::StepSubmitted {
                run_id,
                index,
                description,
                transaction,
            } => {
                tracing::info!(%run_id, step = index, tx = %transaction, "submitted {description}");
            }
            SetupEvent::AwaitingReceipt {
                run_id,
                index,
                transaction,
            } => {
                tracing::info!(%run_id, step = index, tx = %transaction, "waiting for receipt");
            }
            SetupEvent::StepConfirmed {
                run_id,
                index,
                transaction,
            } => {
                tracing::info!(%run_id, step = index, tx = %transaction, "got a success receipt");
            }
            SetupEvent::StepReverted {
                run_id,
                index,
                transaction,
            } => {
                tracing::error!(%run_id, step = index, tx = %transaction, "transaction reverted");
            }
            SetupEvent::SequenceHalted {
                run_id,
                index,
                kind,
                message,
            } => {
                tracing::error!(%run_id, step = index, ?kind, "sequence halted: {message}");
            }
            SetupEvent::SequenceCompleted { run_id, steps } => {
                tracing::info!(%run_id, steps, "sequence completed");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SetupEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SetupEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &SetupEvent) {
        let mut events = self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(event.clone());
    }
}
