//! Agent event output port.
//!
//! [`AgentEventSink`] is the **output port** through which a run reports every
//! transition. Hosts implement it to render progress, write logs or drive
//! tests.
//!
//! `emit` is synchronous and infallible so an observer can never stall or
//! break the loop; sinks that fail simply drop the event.
//!
//! ```text
//! RunAgentUseCase.execute(goal, &composite)
//!                                  |
//!               +------------------+------------------+
//!               |                                     |
//!     ConsoleEventReporter                      JsonlEventLog
//! ```

use pagepilot_domain::AgentEvent;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Receiver of agent events, in emission order.
pub trait AgentEventSink: Send + Sync {
    fn emit(&self, event: &AgentEvent);
}

/// Discards every event.
pub struct NoEventSink;

impl AgentEventSink for NoEventSink {
    fn emit(&self, _event: &AgentEvent) {}
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<AgentEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Wire names of the events recorded so far.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .map(|e| e.iter().map(AgentEvent::event_type).collect())
            .unwrap_or_default()
    }
}

impl AgentEventSink for RecordingEventSink {
    fn emit(&self, event: &AgentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Forwards events to an unbounded tokio channel.
///
/// Events emitted after the receiver is dropped are discarded.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<AgentEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AgentEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AgentEventSink for ChannelEventSink {
    fn emit(&self, event: &AgentEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Fans each event out to several sinks, in order.
///
/// Uses borrowed references so owned and borrowed sinks compose without
/// wrapper types.
pub struct CompositeEventSink<'a> {
    delegates: Vec<&'a dyn AgentEventSink>,
}

impl<'a> CompositeEventSink<'a> {
    pub fn new(delegates: Vec<&'a dyn AgentEventSink>) -> Self {
        Self { delegates }
    }
}

impl AgentEventSink for CompositeEventSink<'_> {
    fn emit(&self, event: &AgentEvent) {
        for d in &self.delegates {
            d.emit(event);
        }
    }
}
