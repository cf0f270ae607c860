//! EventSink port - progress reporting.

use crate::domain::SetupEvent;

/// Receives progress events from the sequencer.
///
/// `emit` is synchronous and must not block; sinks that ship events elsewhere
/// should buffer internally.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SetupEvent);
}
