//! The load session: user commands in, persisted state and published
//! snapshots out.
//!
//! Every confirmed mutation is applied to [`LoadState`] first, then the
//! records it touched are written through the [`LoadRepository`], and
//! finally a fresh [`LoadSnapshot`] is published on a `watch` channel for
//! observers such as the advisory orchestrator.

use tokio::sync::watch;

use cs_domain::trace::TraceEvent;
use cs_domain::{ContainerType, InputError};

use crate::catalog::Catalog;
use crate::load::{LoadSnapshot, LoadState};
use crate::persist::LoadRepository;

/// First phase of a reset. Pass it to [`LoadSession::confirm_reset`] to
/// commit, or to [`LoadSession::cancel_reset`] (or simply drop it) to abort.
///
/// A request only covers the load it was issued for: once the session has
/// published another change, confirming it clears nothing.
#[must_use = "a reset request does nothing until confirmed"]
#[derive(Debug)]
pub struct ResetRequest {
    pending_entries: usize,
    revision: u64,
}

impl ResetRequest {
    /// Number of quantity entries the reset would clear.
    pub fn pending_entries(&self) -> usize {
        self.pending_entries
    }
}

pub struct LoadSession {
    state: LoadState,
    repo: LoadRepository,
    revision: u64,
    snapshot_tx: watch::Sender<LoadSnapshot>,
}

impl LoadSession {
    /// Load persisted state and start publishing snapshots.
    pub fn open(repo: LoadRepository, default_capacity: u64) -> Self {
        let persisted = repo.load(default_capacity);
        let catalog = Catalog::with_customs(persisted.custom_types);
        let state = LoadState::new(catalog, persisted.quantities, persisted.capacity);

        TraceEvent::StateLoaded {
            custom_types: state.catalog().customs().len(),
            quantities: state.quantities().len(),
            capacity: state.capacity(),
        }
        .emit();

        let (snapshot_tx, _) = watch::channel(state.snapshot());
        Self {
            state,
            repo,
            revision: 0,
            snapshot_tx,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current snapshot (same value observers see).
    pub fn snapshot(&self) -> LoadSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Number of snapshots published since the session was opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive a snapshot after every confirmed mutation.
    pub fn subscribe(&self) -> watch::Receiver<LoadSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn set_quantity(&mut self, id: &str, qty: i64) -> bool {
        if !self.state.set_quantity(id, qty) {
            return false;
        }
        self.repo.save_quantities(self.state.quantities());
        self.publish();
        true
    }

    pub fn add_custom_type(&mut self, name: &str, weight: f64) -> Result<ContainerType, InputError> {
        let added = self.state.add_custom_type(name, weight)?;
        self.repo.save_custom_types(self.state.catalog().customs());
        TraceEvent::CustomTypeAdded {
            id: added.id.clone(),
            name: added.name.clone(),
            weight: added.weight,
        }
        .emit();
        self.publish();
        Ok(added)
    }

    /// Delete a custom type and its quantity entry in one step.
    pub fn delete_type(&mut self, id: &str) -> Option<ContainerType> {
        let (removed, had_quantity) = self.state.delete_type(id)?;
        self.repo.save_custom_types(self.state.catalog().customs());
        if had_quantity {
            self.repo.save_quantities(self.state.quantities());
        }
        TraceEvent::CustomTypeRemoved {
            id: removed.id.clone(),
        }
        .emit();
        self.publish();
        Some(removed)
    }

    pub fn set_capacity(&mut self, value: i64) -> bool {
        if !self.state.set_capacity(value) {
            return false;
        }
        self.repo.save_capacity(self.state.capacity());
        self.publish();
        true
    }

    /// Ask to clear all quantities. Nothing changes until confirmed.
    pub fn request_reset(&self) -> ResetRequest {
        ResetRequest {
            pending_entries: self.state.quantities().len(),
            revision: self.revision,
        }
    }

    /// Commit a reset: clears quantities (and with them the advisory),
    /// keeps custom types and capacity. Returns the cleared entry count,
    /// or `None` when the load changed after the request was issued.
    pub fn confirm_reset(&mut self, request: ResetRequest) -> Option<usize> {
        if request.revision != self.revision {
            tracing::warn!(
                requested_at = request.revision,
                current = self.revision,
                "reset request is stale, nothing cleared"
            );
            return None;
        }
        let cleared = self.state.clear_quantities();
        self.repo.save_quantities(self.state.quantities());
        TraceEvent::LoadReset {
            cleared_entries: cleared,
        }
        .emit();
        self.publish();
        Some(cleared)
    }

    /// Abort a reset. Equivalent to dropping the request.
    pub fn cancel_reset(&self, request: ResetRequest) {
        tracing::debug!(pending = request.pending_entries, "reset declined");
    }

    fn publish(&mut self) {
        self.revision += 1;
        let mut snapshot = self.state.snapshot();
        snapshot.revision = self.revision;
        self.snapshot_tx.send_replace(snapshot);
    }
}
