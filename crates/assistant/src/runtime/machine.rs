//! Advisory state machine.
//!
//! Pure and synchronous: the driver in [`super::advisor`] feeds it load
//! snapshots, debounce expiries and oracle results, and publishes
//! [`AdvisorView`]s built from it. Every observed change of the load tuple
//! bumps the generation; an oracle result is applied only when it carries
//! the current generation and the machine is still `Requesting`.

use cs_domain::error::Result;
use cs_domain::trace::TraceEvent;
use cs_domain::{AdvisoryResult, LoadSummary};
use cs_load::LoadSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorPhase {
    /// Nothing loaded, nothing pending.
    Idle,
    /// Waiting for the load to hold still for the debounce window.
    Settling,
    /// Oracle call in flight for the current generation.
    Requesting,
    /// Oracle advice applied.
    Resolved,
    /// Oracle failed; local fallback advice applied.
    Failed,
}

impl AdvisorPhase {
    /// True while an advisory for the current load is still on its way.
    pub fn is_pending(self) -> bool {
        matches!(self, AdvisorPhase::Settling | AdvisorPhase::Requesting)
    }
}

/// What observers see.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorView {
    pub phase: AdvisorPhase,
    /// Last applied advice. Kept while a newer load settles, cleared when
    /// the load becomes empty.
    pub advice: Option<AdvisoryResult>,
    pub generation: u64,
    /// Revision of the last load snapshot the machine has observed.
    pub revision: u64,
}

/// Outcome of observing a snapshot, telling the driver what to do with
/// the debounce deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Observed {
    Unchanged,
    /// (Re)arm the debounce window.
    Arm,
    /// Disarm: the load is empty.
    Disarm,
}

#[derive(Debug)]
pub(crate) struct AdvisorMachine {
    phase: AdvisorPhase,
    generation: u64,
    advice: Option<AdvisoryResult>,
    last: Option<LoadSnapshot>,
    revision: u64,
}

impl AdvisorMachine {
    pub(crate) fn new() -> Self {
        Self {
            phase: AdvisorPhase::Idle,
            generation: 0,
            advice: None,
            last: None,
            revision: 0,
        }
    }

    pub(crate) fn view(&self) -> AdvisorView {
        AdvisorView {
            phase: self.phase,
            advice: self.advice.clone(),
            generation: self.generation,
            revision: self.revision,
        }
    }

    pub(crate) fn observe(&mut self, snapshot: &LoadSnapshot) -> Observed {
        self.revision = snapshot.revision;
        if self.last.as_ref() == Some(snapshot) {
            return Observed::Unchanged;
        }
        self.last = Some(snapshot.clone());

        if snapshot.is_empty() {
            if self.phase == AdvisorPhase::Idle && self.advice.is_none() {
                return Observed::Unchanged;
            }
            self.generation += 1;
            self.phase = AdvisorPhase::Idle;
            self.advice = None;
            return Observed::Disarm;
        }

        self.generation += 1;
        self.phase = AdvisorPhase::Settling;
        Observed::Arm
    }

    /// Debounce window elapsed: move to `Requesting` and hand back the
    /// summary to send, stamped with the current generation.
    pub(crate) fn settle(&mut self) -> Option<(u64, LoadSummary)> {
        if self.phase != AdvisorPhase::Settling {
            return None;
        }
        let snapshot = self.last.as_ref()?;
        self.phase = AdvisorPhase::Requesting;

        TraceEvent::AdvisoryRequested {
            generation: self.generation,
            total_weight: snapshot.total_weight,
            capacity: snapshot.capacity,
        }
        .emit();

        Some((self.generation, snapshot.summary()))
    }

    /// Apply an oracle outcome. Returns whether it became visible.
    pub(crate) fn resolve(&mut self, generation: u64, outcome: Result<AdvisoryResult>) -> bool {
        if generation != self.generation || self.phase != AdvisorPhase::Requesting {
            TraceEvent::AdvisoryDiscarded {
                generation,
                current_generation: self.generation,
            }
            .emit();
            return false;
        }
        let Some(snapshot) = self.last.as_ref() else {
            return false;
        };

        let (phase, advice, fallback) = match outcome {
            Ok(advice) => (AdvisorPhase::Resolved, advice, false),
            Err(e) => {
                tracing::warn!(generation, error = %e, "advisory unavailable, using local judgment");
                let advice = AdvisoryResult::fallback(snapshot.total_weight, snapshot.capacity);
                (AdvisorPhase::Failed, advice, true)
            }
        };

        TraceEvent::AdvisoryApplied {
            generation,
            status: advice.status.to_string(),
            fallback,
        }
        .emit();

        self.phase = phase;
        self.advice = Some(advice);
        true
    }
}
