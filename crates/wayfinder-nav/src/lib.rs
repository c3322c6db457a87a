//! Traversal engine for wayfinder screen graphs.
//!
//! This crate implements the navigation core: BFS routing over the live
//! transition graph, the [`Navigator`] traversal loop with dynamic back-edge
//! maintenance, the element-waiter and failure-reporter collaborator traits,
//! and the broadcast event stream.

pub mod events;
pub mod navigator;
pub mod reporter;
pub mod routing;
pub mod waiter;

pub use events::{EventEmitter, NavEvent};
pub use navigator::{Navigator, NavigatorConfig};
pub use reporter::{
    FailureReport, FailureReporter, RecordingReporter, Severity, SourceLocation, TracingReporter,
};
pub use routing::shortest_path;
pub use waiter::{ElementWaiter, ImmediateWaiter, PollingWaiter, RecordingWaiter};
