//! Reports and warning collection for sync operations
//!
//! Warnings are both logged through `tracing` and collected on the
//! [`Reporter`] so callers can inspect them after a pass. Per-record
//! failures never abort a batch; they accumulate into a [`BatchResult`]
//! and roll up into the final [`SyncReport`].

use serde::{Deserialize, Serialize};

/// Collects warnings raised while converting and reconciling records.
///
/// Passed mutably through every level of an export or import pass so
/// that non-fatal conditions (unresolved handles, invalid selectors)
/// degrade gracefully instead of aborting.
#[derive(Debug, Default)]
pub struct Reporter {
    warnings: Vec<String>,
    deferring: bool,
    deferred_misses: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter that counts unresolved references instead of warning
    /// about them, so the caller can retry the affected records once
    /// later passes have created more records.
    pub fn deferring() -> Self {
        Self {
            deferring: true,
            ..Self::default()
        }
    }

    /// Stop deferring; unresolved references warn immediately again.
    pub fn stop_deferring(&mut self) {
        self.deferring = false;
    }

    /// Record a warning and emit it on the logging sink.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Report a reference that did not resolve. Warns, unless the
    /// reporter is deferring, in which case the miss is only counted.
    pub fn unresolved(&mut self, message: impl Into<String>) {
        if self.deferring {
            self.deferred_misses += 1;
        } else {
            self.warn(message);
        }
    }

    /// Number of unresolved references counted while deferring.
    pub fn deferred_misses(&self) -> usize {
        self.deferred_misses
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Drain collected warnings, leaving the reporter empty.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

/// A single record that could not be saved or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Handle of the record that failed
    pub handle: String,
    /// Host-side reason, e.g. validation messages
    pub reason: String,
}

/// Outcome of importing one data type's definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of records created, updated, or deleted successfully
    pub succeeded: usize,
    /// Records that failed, with reasons; the batch continued past each
    pub failures: Vec<RecordFailure>,
    /// Saved records whose references did not all resolve; the engine
    /// retries these after the remaining type passes have run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deferred: Vec<String>,
}

impl BatchResult {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, handle: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(RecordFailure {
            handle: handle.into(),
            reason: reason.into(),
        });
    }
}

/// Report from a whole import pass across all selected data types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// True when the aggregate contains zero failures
    pub success: bool,
    /// Human-readable actions taken, in order
    pub actions: Vec<String>,
    /// Warnings collected during the pass
    pub warnings: Vec<String>,
    /// Per-record failures across all types
    pub failures: Vec<RecordFailure>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Fold one data type's batch outcome into the report.
    pub fn absorb(&mut self, type_handle: &str, batch: BatchResult) {
        if batch.succeeded > 0 {
            self.actions
                .push(format!("{}: {} record(s) synced", type_handle, batch.succeeded));
        }
        self.failures.extend(batch.failures);
        self.success = self.failures.is_empty();
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
