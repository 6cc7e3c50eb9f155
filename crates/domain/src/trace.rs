use serde::Serialize;

/// Structured trace events emitted across all CargaSegura crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    StateLoaded {
        custom_types: usize,
        quantities: usize,
        capacity: u64,
    },
    RecordPersisted {
        key: String,
        bytes: usize,
    },
    RecordPersistFailed {
        key: String,
        error: String,
    },
    CustomTypeAdded {
        id: String,
        name: String,
        weight: f64,
    },
    CustomTypeRemoved {
        id: String,
    },
    LoadReset {
        cleared_entries: usize,
    },
    AdvisoryRequested {
        generation: u64,
        total_weight: f64,
        capacity: u64,
    },
    AdvisoryApplied {
        generation: u64,
        status: String,
        fallback: bool,
    },
    AdvisoryDiscarded {
        generation: u64,
        current_generation: u64,
    },
    OracleRequest {
        provider: String,
        model: String,
        duration_ms: u64,
        ok: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "cs_event");
    }
}
