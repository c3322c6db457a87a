//! The traversal engine.
//!
//! A [`Navigator`] holds the agent's current position in a built
//! [`SceneGraph`], routes to requested scenes via BFS, executes one
//! transition per hop (pre-wait, action, arrival wait), and maintains the
//! transient back edges that let a back-capable scene return to whichever
//! scene most recently led into it.
//!
//! The navigator borrows the graph mutably for its whole lifetime, so the
//! borrow checker enforces the "one active mutator per graph" rule; create
//! navigators sequentially to share one graph across test runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use wayfinder_graph::SceneGraph;
use wayfinder_types::{Result, WayfinderError};

use crate::events::{EventEmitter, NavEvent};
use crate::reporter::{FailureReport, FailureReporter, Severity};
use crate::routing::shortest_path;
use crate::waiter::ElementWaiter;

/// Configuration for a navigator session.
pub struct NavigatorConfig {
    /// Scene the agent starts at. Falls back to the graph's initial scene.
    pub starting_at: Option<String>,
    /// Bound on every element-existence wait.
    pub wait_timeout: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            starting_at: None,
            wait_timeout: Duration::from_secs(10),
        }
    }
}

/// Drives an agent between scenes of a [`SceneGraph`].
pub struct Navigator<'g> {
    graph: &'g mut SceneGraph,
    current: String,
    /// Most recent scene eligible to be a return target. Dismiss-marked
    /// scenes are never recorded here.
    last_returnable: Option<String>,
    waiter: Arc<dyn ElementWaiter>,
    reporter: Arc<dyn FailureReporter>,
    emitter: EventEmitter,
    wait_timeout: Duration,
}

impl std::fmt::Debug for Navigator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current)
            .field("last_returnable", &self.last_returnable)
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}

impl<'g> Navigator<'g> {
    /// Create a navigator starting at the graph's initial scene.
    ///
    /// Builds the graph first if nobody has yet (idempotent).
    pub fn new(
        graph: &'g mut SceneGraph,
        waiter: Arc<dyn ElementWaiter>,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self> {
        Self::with_config(graph, waiter, reporter, NavigatorConfig::default())
    }

    pub fn with_config(
        graph: &'g mut SceneGraph,
        waiter: Arc<dyn ElementWaiter>,
        reporter: Arc<dyn FailureReporter>,
        config: NavigatorConfig,
    ) -> Result<Self> {
        graph.build()?;

        let start = config
            .starting_at
            .or_else(|| graph.initial().map(String::from));
        let Some(start) = start else {
            let err = WayfinderError::NoInitialScene;
            reporter.report(FailureReport::new(err.to_string(), Severity::Error));
            return Err(err);
        };
        if graph.lookup(&start).is_none() {
            let err = WayfinderError::UnknownScene { name: start };
            reporter.report(FailureReport::new(err.to_string(), Severity::Error));
            return Err(err);
        }

        Ok(Self {
            graph,
            current: start,
            last_returnable: None,
            waiter,
            reporter,
            emitter: EventEmitter::default(),
            wait_timeout: config.wait_timeout,
        })
    }

    /// Name of the scene the agent currently occupies.
    pub fn current_scene(&self) -> &str {
        &self.current
    }

    /// Most recent return-eligible scene, if any.
    pub fn last_returnable(&self) -> Option<&str> {
        self.last_returnable.as_deref()
    }

    /// Read access to a scene of the underlying graph. The graph itself is
    /// exclusively borrowed for the navigator's lifetime, so this is the way
    /// to inspect back-edge state mid-session.
    pub fn lookup_scene(&self, name: &str) -> Option<&wayfinder_graph::Scene> {
        self.graph.lookup(name)
    }

    /// Subscribe to traversal events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<NavEvent> {
        self.emitter.subscribe()
    }

    /// Route to `target` and walk there, executing one transition per hop.
    ///
    /// On failure the agent stays on the last scene it settled at; callers
    /// should resynchronize via [`force_current`](Self::force_current)
    /// before navigating again.
    pub async fn goto(&mut self, target: &str) -> Result<()> {
        if self.graph.lookup(target).is_none() {
            let err = self.fail(WayfinderError::UnknownScene {
                name: target.to_string(),
            });
            self.emit_failed(target, &err);
            return Err(err);
        }

        // Routes are recomputed on every call: back edges come and go.
        let path = shortest_path(self.graph, &self.current, target);
        if path.is_empty() {
            let err = self.fail(WayfinderError::NoRoute {
                from: self.current.clone(),
                to: target.to_string(),
            });
            self.emit_failed(target, &err);
            return Err(err);
        }

        tracing::debug!(from = %self.current, to = %target, hops = path.len() - 1, "navigating");
        self.emitter.emit(NavEvent::TraversalStarted {
            from: self.current.clone(),
            to: target.to_string(),
            hops: path.len() - 1,
        });

        for next in path.into_iter().skip(1) {
            if let Err(err) = self.take_hop(&next).await {
                self.emit_failed(target, &err);
                return Err(err);
            }
        }

        self.emitter.emit(NavEvent::TraversalCompleted {
            target: target.to_string(),
        });
        Ok(())
    }

    /// Execute the single transition from the current scene to `next`,
    /// applying return bookkeeping and back-edge maintenance.
    async fn take_hop(&mut self, next: &str) -> Result<()> {
        let from = self.current.clone();

        let (dismiss, transition) = {
            let scene = self
                .graph
                .lookup(&from)
                .ok_or_else(|| WayfinderError::MissingTransition {
                    from: from.clone(),
                    to: next.to_string(),
                })?;
            (scene.dismiss_on_use(), scene.transition(next).cloned())
        };

        // A dismiss-marked scene is never eligible to be returned to.
        if !dismiss {
            self.last_returnable = Some(from.clone());
        }

        // The path finder only emits existing edges; a miss here is a bug.
        let transition = transition.ok_or_else(|| WayfinderError::MissingTransition {
            from: from.clone(),
            to: next.to_string(),
        })?;

        if let Some(locator) = &transition.wait_for {
            let waited = self.waiter.wait_for(locator, self.wait_timeout).await;
            waited.map_err(|err| self.fail(err))?;
        }

        let started = Instant::now();
        (transition.action)().map_err(|err| WayfinderError::ActionFailed {
            scene: next.to_string(),
            message: err.to_string(),
        })?;

        let arrival = self.graph.lookup(next).and_then(|s| s.exists_when().cloned());
        if let Some(locator) = arrival {
            let waited = self.waiter.wait_for(&locator, self.wait_timeout).await;
            waited.map_err(|err| self.fail(err))?;
        }

        // Bind the arrived scene's back edge to the most recent
        // return-eligible scene, unless one is already bound.
        if let Some(return_to) = self.last_returnable.clone() {
            if let Some(scene) = self.graph.scene_mut(next) {
                if scene.bind_return(return_to.clone()) {
                    self.emitter.emit(NavEvent::BackEdgeBound {
                        scene: next.to_string(),
                        return_to,
                    });
                }
            }
        }

        // Taking a back edge consumes it: one use per arrival.
        if let Some(scene) = self.graph.scene_mut(&from) {
            if scene.returns_to() == Some(next) {
                scene.release_return();
                self.emitter.emit(NavEvent::BackEdgeReleased { scene: from.clone() });
            }
        }

        self.current = next.to_string();
        self.emitter.emit(NavEvent::TransitionTaken {
            from,
            to: next.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
        });
        Ok(())
    }

    /// Reposition the agent without executing any actions.
    ///
    /// An escape hatch for resynchronizing the model with the actual
    /// application state (e.g. after an unexpected dialog). Not a substitute
    /// for missing graph edges in normal test flow.
    pub async fn force_current(&mut self, name: &str) -> Result<()> {
        if self.graph.lookup(name).is_none() {
            return Err(self.fail(WayfinderError::UnknownScene {
                name: name.to_string(),
            }));
        }
        tracing::debug!(from = %self.current, to = %name, "forcing current scene");
        self.current = name.to_string();
        self.emitter.emit(NavEvent::CurrentForced {
            scene: name.to_string(),
        });
        Ok(())
    }

    /// Goto each name in order, invoking `visitor` with the scene name after
    /// arrival. Stops and propagates on the first routing failure.
    pub async fn visit<I, S, F>(&mut self, names: I, mut visitor: F) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str),
    {
        for name in names {
            let name = name.as_ref();
            self.goto(name).await?;
            visitor(name);
        }
        Ok(())
    }

    /// Visit every registered scene exactly once, in registry iteration
    /// order (not guaranteed to be any particular order).
    pub async fn visit_all<F>(&mut self, visitor: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let names = self.graph.scene_names();
        self.visit(names, visitor).await
    }

    /// Route back to the graph's designated initial scene.
    pub async fn return_to_start(&mut self) -> Result<()> {
        let Some(initial) = self.graph.initial().map(String::from) else {
            return Err(self.fail(WayfinderError::NoInitialScene));
        };
        self.goto(&initial).await
    }

    /// Hand navigation failures to the reporter; pass everything through.
    fn fail(&self, err: WayfinderError) -> WayfinderError {
        if err.is_navigation() {
            self.reporter
                .report(FailureReport::new(err.to_string(), Severity::Error));
        }
        err
    }

    fn emit_failed(&self, target: &str, err: &WayfinderError) {
        self.emitter.emit(NavEvent::TraversalFailed {
            target: target.to_string(),
            error: err.to_string(),
        });
    }
}
