//! Scene and transition data model.
//!
//! A [`Scene`] is a named application state with an ordered list of outgoing
//! [`Transition`]s, one per distinct destination. Back-capable scenes
//! additionally carry a back action that the navigator binds to a transient
//! return edge at traversal time.

use std::sync::Arc;

use wayfinder_types::{Locator, Result};

/// A no-argument side-effecting procedure, e.g. a tap or swipe supplied by
/// the host test framework. The engine invokes it but never interprets it.
pub type Action = Arc<dyn Fn() -> Result<()> + Send + Sync + 'static>;

/// Wrap a closure into an [`Action`].
pub fn action(f: impl Fn() -> Result<()> + Send + Sync + 'static) -> Action {
    Arc::new(f)
}

/// An action that does nothing. Useful for states reached without any
/// gesture (e.g. app launch) and in tests.
pub fn noop_action() -> Action {
    Arc::new(|| Ok(()))
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// A directed, unweighted edge from one scene to another.
#[derive(Clone)]
pub struct Transition {
    /// Name of the destination scene.
    pub to: String,
    /// Procedure that moves the application from the source to `to`.
    pub action: Action,
    /// Element that must exist before the action runs.
    pub wait_for: Option<Locator>,
}

impl Transition {
    pub fn new(to: impl Into<String>, action: Action) -> Self {
        Self {
            to: to.into(),
            action,
            wait_for: None,
        }
    }

    /// Require `locator` to be present before the action is executed.
    #[must_use]
    pub fn with_wait_for(mut self, locator: impl Into<Locator>) -> Self {
        self.wait_for = Some(locator.into());
        self
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("to", &self.to)
            .field("wait_for", &self.wait_for)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A named application state in the navigation graph.
///
/// Builder callbacks receive `&mut Scene` during [`SceneGraph::build`]
/// (crate::SceneGraph::build) and use the declaration methods to describe the
/// scene's outgoing transitions and optional attributes. The `return_to` /
/// transient-edge pair is maintained by the navigator afterwards.
pub struct Scene {
    name: String,
    /// Outgoing edges in declaration order, one per distinct destination.
    /// Declaration order is the routing tie-break, so this stays a Vec.
    transitions: Vec<Transition>,
    exists_when: Option<Locator>,
    back_action: Option<Action>,
    dismiss_on_use: bool,
    /// Name of the scene the transient back edge currently points at.
    /// Present if and only if that edge is present in `transitions`.
    return_to: Option<String>,
}

impl Scene {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            exists_when: None,
            back_action: None,
            dismiss_on_use: false,
            return_to: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- builder-callback surface ---

    /// Declare a transition. A later declaration for the same destination
    /// replaces the earlier one in place, keeping its position in the
    /// declaration order.
    pub fn add_transition(&mut self, transition: Transition) {
        match self.transitions.iter_mut().find(|t| t.to == transition.to) {
            Some(existing) => *existing = transition,
            None => self.transitions.push(transition),
        }
    }

    /// Shorthand for declaring a plain transition.
    pub fn transition_to(&mut self, to: impl Into<String>, action: Action) {
        self.add_transition(Transition::new(to, action));
    }

    /// Mark this scene back-capable: the navigator will bind `action` to a
    /// transient edge pointing at whichever scene most recently led here.
    pub fn set_back_action(&mut self, action: Action) {
        self.back_action = Some(action);
    }

    /// Element the navigator waits on after arriving at this scene.
    pub fn set_exists_when(&mut self, locator: impl Into<Locator>) {
        self.exists_when = Some(locator.into());
    }

    /// A dismiss-marked scene (menus, sheets, alerts) is never recorded as a
    /// return target once left.
    pub fn set_dismiss_on_use(&mut self, dismiss: bool) {
        self.dismiss_on_use = dismiss;
    }

    // --- read access ---

    /// Outgoing edges in declaration order, including any live back edge.
    pub fn outgoing(&self) -> &[Transition] {
        &self.transitions
    }

    /// Look up the transition to `to`, if declared.
    pub fn transition(&self, to: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.to == to)
    }

    pub fn exists_when(&self) -> Option<&Locator> {
        self.exists_when.as_ref()
    }

    pub fn dismiss_on_use(&self) -> bool {
        self.dismiss_on_use
    }

    pub fn has_back_action(&self) -> bool {
        self.back_action.is_some()
    }

    /// The scene the transient back edge currently returns to, if bound.
    pub fn returns_to(&self) -> Option<&str> {
        self.return_to.as_deref()
    }

    // --- back-edge maintenance (navigator surface) ---

    /// Bind the back action to a transient edge returning to `to`.
    ///
    /// No-op returning `false` when the scene has no back action, a binding
    /// is already active, or a static transition to `to` already exists
    /// (that edge already provides the route; replacing it would delete it
    /// on release).
    pub fn bind_return(&mut self, to: impl Into<String>) -> bool {
        let to = to.into();
        if self.return_to.is_some() || self.transition(&to).is_some() {
            return false;
        }
        let Some(action) = self.back_action.clone() else {
            return false;
        };
        tracing::debug!(scene = %self.name, return_to = %to, "binding back edge");
        self.transitions.push(Transition::new(to.clone(), action));
        self.return_to = Some(to);
        true
    }

    /// Remove the transient back edge, returning the name it pointed at.
    /// The back edge is consumed by taking it: one use per arrival.
    pub fn release_return(&mut self) -> Option<String> {
        let to = self.return_to.take()?;
        tracing::debug!(scene = %self.name, return_to = %to, "releasing back edge");
        self.transitions.retain(|t| t.to != to);
        Some(to)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field(
                "transitions",
                &self.transitions.iter().map(|t| &t.to).collect::<Vec<_>>(),
            )
            .field("exists_when", &self.exists_when)
            .field("has_back_action", &self.back_action.is_some())
            .field("dismiss_on_use", &self.dismiss_on_use)
            .field("return_to", &self.return_to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_transition_keeps_declaration_order() {
        let mut scene = Scene::new("Home");
        scene.transition_to("Login", noop_action());
        scene.transition_to("Settings", noop_action());
        scene.transition_to("About", noop_action());

        let order: Vec<_> = scene.outgoing().iter().map(|t| t.to.as_str()).collect();
        assert_eq!(order, vec!["Login", "Settings", "About"]);
    }

    #[test]
    fn duplicate_destination_replaces_in_place() {
        let fired = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let fired2 = fired.clone();

        let mut scene = Scene::new("Home");
        scene.transition_to("Login", noop_action());
        scene.transition_to("Settings", noop_action());
        scene.add_transition(Transition::new(
            "Login",
            action(move || {
                fired2.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }),
        ));

        // Still two transitions, Login still first.
        let order: Vec<_> = scene.outgoing().iter().map(|t| t.to.as_str()).collect();
        assert_eq!(order, vec!["Login", "Settings"]);

        // The replacement action is the live one.
        (scene.transition("Login").unwrap().action)().unwrap();
        assert!(fired.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn transition_lookup_by_destination() {
        let mut scene = Scene::new("Home");
        scene.transition_to("Login", noop_action());
        assert!(scene.transition("Login").is_some());
        assert!(scene.transition("Missing").is_none());
    }

    #[test]
    fn wait_for_recorded_on_transition() {
        let t = Transition::new("Login", noop_action()).with_wait_for("login-button");
        assert_eq!(t.wait_for, Some(Locator::new("login-button")));
    }

    #[test]
    fn bind_return_requires_back_action() {
        let mut scene = Scene::new("Detail");
        assert!(!scene.bind_return("List"));
        assert!(scene.returns_to().is_none());
        assert!(scene.outgoing().is_empty());
    }

    #[test]
    fn bind_return_adds_live_edge_once() {
        let mut scene = Scene::new("Detail");
        scene.set_back_action(noop_action());

        assert!(scene.bind_return("List"));
        assert_eq!(scene.returns_to(), Some("List"));
        assert!(scene.transition("List").is_some());

        // Second bind while active is rejected.
        assert!(!scene.bind_return("Other"));
        assert_eq!(scene.returns_to(), Some("List"));
    }

    #[test]
    fn bind_return_skips_existing_static_edge() {
        let mut scene = Scene::new("Detail");
        scene.set_back_action(noop_action());
        scene.transition_to("List", noop_action());

        assert!(!scene.bind_return("List"));
        assert!(scene.returns_to().is_none());
        assert_eq!(scene.outgoing().len(), 1);
    }

    #[test]
    fn release_return_removes_edge_and_clears_binding() {
        let mut scene = Scene::new("Detail");
        scene.set_back_action(noop_action());
        scene.bind_return("List");

        assert_eq!(scene.release_return(), Some("List".to_string()));
        assert!(scene.returns_to().is_none());
        assert!(scene.transition("List").is_none());

        // Releasing with no binding is a no-op.
        assert_eq!(scene.release_return(), None);
    }

    #[test]
    fn rebind_after_release_is_allowed() {
        let mut scene = Scene::new("Detail");
        scene.set_back_action(noop_action());
        scene.bind_return("List");
        scene.release_return();

        assert!(scene.bind_return("Search"));
        assert_eq!(scene.returns_to(), Some("Search"));
    }
}
