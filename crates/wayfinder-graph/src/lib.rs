//! Scene graph data model and two-phase builder.
//!
//! This crate provides the declarative layer of wayfinder: test authors
//! register named scenes with deferred builder callbacks, and an explicit
//! build step materializes the node and edge sets and verifies that every
//! declared destination resolves.

pub mod graph;
pub mod scene;

pub use graph::{SceneBuilder, SceneGraph};
pub use scene::{action, noop_action, Action, Scene, Transition};
