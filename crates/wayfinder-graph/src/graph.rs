//! Scene registry and two-phase graph construction.
//!
//! Phase 1: [`SceneGraph::register`] stores a name and a deferred builder
//! callback. Phase 2: [`SceneGraph::build`] instantiates every scene, runs
//! every builder exactly once, then resolves every declared destination.
//! Build is idempotent; a dangling destination aborts it with
//! [`WayfinderError::UnresolvedTransition`] instead of surfacing later as a
//! routing failure.

use std::collections::HashMap;

use wayfinder_types::{Result, WayfinderError};

use crate::scene::Scene;

/// Deferred callback that declares a scene's transitions and attributes.
/// Invoked exactly once, during [`SceneGraph::build`].
pub type SceneBuilder = Box<dyn FnOnce(&mut Scene) + Send>;

/// Registry of named scenes with one-shot lazy construction.
///
/// The graph is a plain value owned by the test harness; the navigator
/// borrows it mutably for the duration of a traversal session, which is
/// exactly the "one active mutator at a time" rule the design requires.
#[derive(Default)]
pub struct SceneGraph {
    scenes: HashMap<String, Scene>,
    builders: HashMap<String, SceneBuilder>,
    initial: Option<String>,
    built: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene under `name` with a deferred builder.
    ///
    /// The builder is not invoked here; it runs during [`build`](Self::build).
    pub fn register(
        &mut self,
        name: impl Into<String>,
        builder: impl FnOnce(&mut Scene) + Send + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.built {
            return Err(WayfinderError::GraphSealed { name });
        }
        if self.builders.contains_key(&name) || self.scenes.contains_key(&name) {
            return Err(WayfinderError::DuplicateScene { name });
        }
        self.builders.insert(name, Box::new(builder));
        Ok(())
    }

    /// Designate the default starting scene. Resolved during build.
    pub fn set_initial(&mut self, name: impl Into<String>) {
        self.initial = Some(name.into());
    }

    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// Materialize the graph: instantiate scenes, run builders, resolve
    /// destinations. Idempotent — subsequent calls are no-ops.
    pub fn build(&mut self) -> Result<()> {
        if self.built {
            return Ok(());
        }

        // Instantiate first so builders only ever see complete membership.
        for name in self.builders.keys() {
            self.scenes.insert(name.clone(), Scene::new(name.clone()));
        }

        let builders: Vec<(String, SceneBuilder)> = self.builders.drain().collect();
        for (name, builder) in builders {
            if let Some(scene) = self.scenes.get_mut(&name) {
                builder(scene);
            }
        }

        // Every declared destination must resolve now, not at traversal time.
        for scene in self.scenes.values() {
            for transition in scene.outgoing() {
                if !self.scenes.contains_key(&transition.to) {
                    return Err(WayfinderError::UnresolvedTransition {
                        from: scene.name().to_string(),
                        to: transition.to.clone(),
                    });
                }
            }
        }
        if let Some(initial) = &self.initial {
            if !self.scenes.contains_key(initial) {
                return Err(WayfinderError::UnresolvedTransition {
                    from: "<initial>".to_string(),
                    to: initial.clone(),
                });
            }
        }

        self.built = true;
        tracing::debug!(scenes = self.scenes.len(), "scene graph built");
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn lookup(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    /// Mutable scene access, used by the navigator for back-edge
    /// maintenance while traversing.
    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    /// Names of all registered scenes, in registry iteration order.
    /// The order is not guaranteed; callers must not depend on it.
    pub fn scene_names(&self) -> Vec<String> {
        self.scenes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        if self.built {
            self.scenes.len()
        } else {
            self.builders.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("built", &self.built)
            .field("initial", &self.initial)
            .field("scenes", &self.scenes.len())
            .field("pending_builders", &self.builders.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::noop_action;

    #[test]
    fn register_and_build_resolves_scenes() {
        let mut graph = SceneGraph::new();
        graph
            .register("Home", |s| s.transition_to("Login", noop_action()))
            .unwrap();
        graph.register("Login", |_| {}).unwrap();

        graph.build().unwrap();

        assert!(graph.is_built());
        assert_eq!(graph.len(), 2);
        let home = graph.lookup("Home").unwrap();
        assert!(home.transition("Login").is_some());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut graph = SceneGraph::new();
        graph.register("Home", |_| {}).unwrap();
        let err = graph.register("Home", |_| {}).unwrap_err();
        assert!(matches!(err, WayfinderError::DuplicateScene { name } if name == "Home"));
    }

    #[test]
    fn registration_after_build_is_rejected() {
        let mut graph = SceneGraph::new();
        graph.register("Home", |_| {}).unwrap();
        graph.build().unwrap();

        let err = graph.register("Late", |_| {}).unwrap_err();
        assert!(matches!(err, WayfinderError::GraphSealed { name } if name == "Late"));
    }

    #[test]
    fn unresolved_destination_fails_build() {
        let mut graph = SceneGraph::new();
        graph
            .register("Home", |s| s.transition_to("Nowhere", noop_action()))
            .unwrap();

        let err = graph.build().unwrap_err();
        match err {
            WayfinderError::UnresolvedTransition { from, to } => {
                assert_eq!(from, "Home");
                assert_eq!(to, "Nowhere");
            }
            other => panic!("expected UnresolvedTransition, got: {other:?}"),
        }
        assert!(!graph.is_built());
    }

    #[test]
    fn unresolved_initial_fails_build() {
        let mut graph = SceneGraph::new();
        graph.register("Home", |_| {}).unwrap();
        graph.set_initial("Ghost");

        let err = graph.build().unwrap_err();
        assert!(matches!(err, WayfinderError::UnresolvedTransition { to, .. } if to == "Ghost"));
    }

    #[test]
    fn build_is_idempotent() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter2 = counter.clone();

        let mut graph = SceneGraph::new();
        graph
            .register("Home", move |_| {
                counter2.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })
            .unwrap();

        graph.build().unwrap();
        graph.build().unwrap();

        // Builder ran exactly once.
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn builders_see_only_their_own_scene() {
        let mut graph = SceneGraph::new();
        graph
            .register("A", |s| {
                assert_eq!(s.name(), "A");
                s.transition_to("B", noop_action());
            })
            .unwrap();
        graph.register("B", |s| assert_eq!(s.name(), "B")).unwrap();
        graph.build().unwrap();
    }

    #[test]
    fn scene_names_lists_everything() {
        let mut graph = SceneGraph::new();
        graph.register("A", |_| {}).unwrap();
        graph.register("B", |_| {}).unwrap();
        graph.build().unwrap();

        let mut names = graph.scene_names();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn initial_survives_build() {
        let mut graph = SceneGraph::new();
        graph.register("Home", |_| {}).unwrap();
        graph.set_initial("Home");
        graph.build().unwrap();
        assert_eq!(graph.initial(), Some("Home"));
    }
}
