//! Shared types for the wayfinder navigation engine.
//!
//! This crate provides the foundational types used across the other wayfinder
//! crates:
//! - `WayfinderError` — unified error taxonomy
//! - `Locator` — opaque reference to a UI element
//! - `Result<T>` — convenience alias

use serde::{Deserialize, Serialize};

/// Unified error type for all wayfinder subsystems.
#[derive(Debug, thiserror::Error)]
pub enum WayfinderError {
    // === Registration / build errors ===
    #[error("Scene '{name}' is already registered")]
    DuplicateScene { name: String },

    #[error("Cannot register scene '{name}': the graph is already built")]
    GraphSealed { name: String },

    #[error("Transition from '{from}' points at unregistered scene '{to}'")]
    UnresolvedTransition { from: String, to: String },

    // === Navigation errors ===
    #[error("Unknown scene '{name}'")]
    UnknownScene { name: String },

    #[error("No route from '{from}' to '{to}'")]
    NoRoute { from: String, to: String },

    #[error("Element '{locator}' did not appear within {timeout_ms}ms")]
    ElementWaitTimeout { locator: String, timeout_ms: u64 },

    #[error("No initial scene configured")]
    NoInitialScene,

    #[error("Action failed entering scene '{scene}': {message}")]
    ActionFailed { scene: String, message: String },

    // === Internal ===
    #[error("Computed path references missing transition '{from}' -> '{to}'")]
    MissingTransition { from: String, to: String },

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl WayfinderError {
    /// Returns `true` for authoring defects caught while the graph is being
    /// registered or built. These abort construction and are never reported
    /// as ordinary test failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WayfinderError::DuplicateScene { .. }
                | WayfinderError::GraphSealed { .. }
                | WayfinderError::UnresolvedTransition { .. }
        )
    }

    /// Returns `true` for routing failures that surface through the failure
    /// reporter as localized test failures.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            WayfinderError::UnknownScene { .. }
                | WayfinderError::NoRoute { .. }
                | WayfinderError::ElementWaitTimeout { .. }
                | WayfinderError::NoInitialScene
        )
    }

    /// Returns `true` if the error indicates a bug in the engine itself
    /// rather than an authoring or runtime condition.
    pub fn is_internal(&self) -> bool {
        matches!(self, WayfinderError::MissingTransition { .. })
    }
}

/// A convenience alias for `Result<T, WayfinderError>`.
pub type Result<T> = std::result::Result<T, WayfinderError>;

// ---------------------------------------------------------------------------
// Locator — opaque reference to a UI element
// ---------------------------------------------------------------------------

/// Opaque handle to a UI element the host framework can wait on.
///
/// The engine never interprets the contents; it only hands the locator to the
/// element-existence waiter. Whatever query language the host uses
/// (accessibility id, XPath, CSS selector) fits in here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(query: &str) -> Self {
        Self(query.to_string())
    }
}

impl From<String> for Locator {
    fn from(query: String) -> Self {
        Self(query)
    }
}
