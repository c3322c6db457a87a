//! Failure reporter trait and built-in implementations.
//!
//! Routing failures (unknown scene, no route, wait timeout, missing initial
//! scene) surface as ordinary test failures through the host framework, not
//! as crashes. The navigator hands every such failure to the reporter with a
//! source location and severity before returning it as an `Err`.

use std::panic::Location;

/// Severity of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// File/line context attached to a failure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    /// Capture the caller's location. Works through synchronous call chains;
    /// async frames report the site where the failure was classified.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = Location::caller();
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single failure handed to the host framework.
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub message: String,
    pub location: SourceLocation,
    pub severity: Severity,
}

impl FailureReport {
    #[track_caller]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            location: SourceLocation::caller(),
            severity,
        }
    }
}

/// Records a test failure without raising a host-level exception.
pub trait FailureReporter: Send + Sync {
    fn report(&self, report: FailureReport);
}

// ---------------------------------------------------------------------------
// TracingReporter
// ---------------------------------------------------------------------------

/// Forwards reports to `tracing` at the severity-matching level.
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, report: FailureReport) {
        match report.severity {
            Severity::Error => {
                tracing::error!(location = %report.location, "{}", report.message)
            }
            Severity::Warning => {
                tracing::warn!(location = %report.location, "{}", report.message)
            }
            Severity::Info => {
                tracing::info!(location = %report.location, "{}", report.message)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

/// Collects reports for later inspection. Test double.
#[derive(Default)]
pub struct RecordingReporter {
    reports: std::sync::Mutex<Vec<FailureReport>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, report: FailureReport) {
        self.reports.lock().unwrap().push(report);
    }
}
