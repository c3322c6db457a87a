//! Navigation event stream for observability.
//!
//! Emits [`NavEvent`]s via a [`tokio::sync::broadcast`] channel so external
//! observers (loggers, reporters, UIs) can follow traversal progress without
//! coupling to the navigator internals.

use serde::{Deserialize, Serialize};

/// Events emitted during traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NavEvent {
    TraversalStarted {
        from: String,
        to: String,
        hops: usize,
    },
    TransitionTaken {
        from: String,
        to: String,
        duration_ms: u64,
    },
    BackEdgeBound {
        scene: String,
        return_to: String,
    },
    BackEdgeReleased {
        scene: String,
    },
    CurrentForced {
        scene: String,
    },
    TraversalCompleted {
        target: String,
    },
    TraversalFailed {
        target: String,
        error: String,
    },
}

/// Event emitter wrapping a broadcast sender.
#[derive(Clone)]
pub struct EventEmitter {
    sender: tokio::sync::broadcast::Sender<NavEvent>,
}

impl EventEmitter {
    /// Create a new emitter with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all current subscribers.
    ///
    /// If there are no active receivers the event is silently dropped.
    pub fn emit(&self, event: NavEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<NavEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(256)
    }
}
