//! Caller-owned export status.
//!
//! The status doubles as the re-entrancy guard: only one export can hold
//! `InProgress` at a time, and observers can subscribe to every change.

use std::sync::Arc;

use tokio::sync::watch;

use super::types::ExportState;
use crate::error::ExportError;

/// Shared handle to the state of an export action
#[derive(Debug, Clone)]
pub struct ExportStatus {
    tx: Arc<watch::Sender<ExportState>>,
}

impl ExportStatus {
    /// Create a status starting at `Idle`
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ExportState::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state
    pub fn current(&self) -> ExportState {
        self.tx.borrow().clone()
    }

    /// Whether an export is running
    pub fn is_exporting(&self) -> bool {
        self.tx.borrow().is_in_progress()
    }

    /// Receive every future state change
    pub fn subscribe(&self) -> watch::Receiver<ExportState> {
        self.tx.subscribe()
    }

    /// Return to `Idle` unless an export is running
    pub fn reset(&self) {
        self.tx.send_if_modified(|state| {
            if state.is_in_progress() {
                false
            } else {
                *state = ExportState::Idle;
                true
            }
        });
    }

    /// Move to `InProgress`, or return `None` if an export already is
    pub(crate) fn begin(&self) -> Option<InFlight<'_>> {
        let mut started = false;
        self.tx.send_if_modified(|state| {
            if state.is_in_progress() {
                return false;
            }
            *state = ExportState::InProgress;
            started = true;
            true
        });
        // Only a successful start may own a guard; a dropped guard records a cancellation
        started.then(|| InFlight {
            status: self,
            finished: false,
        })
    }
}

impl Default for ExportStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the holder owns the `InProgress` state
///
/// Dropping it without calling [`InFlight::finish`] records a cancellation.
pub(crate) struct InFlight<'a> {
    status: &'a ExportStatus,
    finished: bool,
}

impl InFlight<'_> {
    /// Record the final state of the export
    pub(crate) fn finish(mut self, state: ExportState) {
        self.finished = true;
        self.status.tx.send_replace(state);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.status
                .tx
                .send_replace(ExportState::Failed(Arc::new(ExportError::Cancelled)));
        }
    }
}
