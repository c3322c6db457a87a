//! Element-existence waiter trait and built-in implementations.
//!
//! The waiter is the engine's single suspension point: before a transition's
//! action runs (`wait_for`) and after arriving at a scene (`exists_when`),
//! the navigator blocks on the waiter up to a bounded timeout.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use wayfinder_types::{Locator, Result, WayfinderError};

/// Blocks until a UI element exists or the timeout elapses.
///
/// Implementations wrap the host framework's own wait mechanism; the engine
/// only cares about present-within-timeout or not.
#[async_trait]
pub trait ElementWaiter: Send + Sync {
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<()>;
}

// ---------------------------------------------------------------------------
// ImmediateWaiter
// ---------------------------------------------------------------------------

/// Treats every element as already present. Useful when the host performs
/// its own synchronization, and as the default in examples.
pub struct ImmediateWaiter;

#[async_trait]
impl ElementWaiter for ImmediateWaiter {
    async fn wait_for(&self, _locator: &Locator, _timeout: Duration) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingWaiter
// ---------------------------------------------------------------------------

/// Records every wait and reports a timeout for a configured set of
/// never-appearing elements. Test double.
#[derive(Default)]
pub struct RecordingWaiter {
    waits: std::sync::Mutex<Vec<Locator>>,
    missing: HashSet<Locator>,
}

impl RecordingWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed locator times out instead of appearing.
    pub fn with_missing(locators: impl IntoIterator<Item = Locator>) -> Self {
        Self {
            waits: std::sync::Mutex::new(Vec::new()),
            missing: locators.into_iter().collect(),
        }
    }

    /// All locators waited on so far, in order.
    pub fn waits(&self) -> Vec<Locator> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ElementWaiter for RecordingWaiter {
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        self.waits.lock().unwrap().push(locator.clone());
        if self.missing.contains(locator) {
            return Err(WayfinderError::ElementWaitTimeout {
                locator: locator.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PollingWaiter
// ---------------------------------------------------------------------------

/// Polls a host-supplied existence probe at a fixed interval until it
/// reports the element present, bounded by `tokio::time::timeout`.
pub struct PollingWaiter<P> {
    probe: P,
    interval: Duration,
}

impl<P> PollingWaiter<P>
where
    P: Fn(&Locator) -> bool + Send + Sync,
{
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            interval: Duration::from_millis(50),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl<P> ElementWaiter for PollingWaiter<P>
where
    P: Fn(&Locator) -> bool + Send + Sync,
{
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let poll = async {
            while !(self.probe)(locator) {
                tokio::time::sleep(self.interval).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            WayfinderError::ElementWaitTimeout {
                locator: locator.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
        })
    }
}
