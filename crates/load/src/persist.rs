//! Persistence adapter: typed load/save of the three persisted records.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use cs_domain::trace::TraceEvent;
use cs_domain::ContainerType;

use crate::load::QuantityMap;
use crate::store::KvStore;

pub const CUSTOM_TYPES_KEY: &str = "cs_custom_boxes";
pub const QUANTITIES_KEY: &str = "cs_quantities";
pub const CAPACITY_KEY: &str = "cs_capacity";

/// State read back at startup, each record defaulted independently.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedLoad {
    pub custom_types: Vec<ContainerType>,
    pub quantities: QuantityMap,
    pub capacity: u64,
}

/// Reads and writes the custom type list, the quantity map and the
/// capacity. Never fails: unreadable records fall back to defaults and
/// write failures are logged.
#[derive(Clone)]
pub struct LoadRepository {
    store: Arc<dyn KvStore>,
}

impl LoadRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load all three records.
    pub fn load(&self, default_capacity: u64) -> PersistedLoad {
        let custom_types = self.read_json(CUSTOM_TYPES_KEY).unwrap_or_default();
        let quantities = self.read_json(QUANTITIES_KEY).unwrap_or_default();
        let capacity = self
            .read_raw(CAPACITY_KEY)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(v) => Some(v.max(1)),
                Err(e) => {
                    tracing::warn!(key = CAPACITY_KEY, error = %e, "unreadable capacity, using default");
                    None
                }
            })
            .unwrap_or_else(|| default_capacity.max(1));

        PersistedLoad {
            custom_types,
            quantities,
            capacity,
        }
    }

    pub fn save_custom_types(&self, types: &[ContainerType]) {
        self.write_json(CUSTOM_TYPES_KEY, types);
    }

    pub fn save_quantities(&self, quantities: &QuantityMap) {
        self.write_json(QUANTITIES_KEY, quantities);
    }

    pub fn save_capacity(&self, capacity: u64) {
        self.write_raw(CAPACITY_KEY, capacity.to_string());
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read record, using default");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt record, using default");
                None
            }
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write_raw(key, json),
            Err(e) => TraceEvent::RecordPersistFailed {
                key: key.to_owned(),
                error: e.to_string(),
            }
            .emit(),
        }
    }

    fn write_raw(&self, key: &str, value: String) {
        match self.store.set(key, &value) {
            Ok(()) => TraceEvent::RecordPersisted {
                key: key.to_owned(),
                bytes: value.len(),
            }
            .emit(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to persist record");
                TraceEvent::RecordPersistFailed {
                    key: key.to_owned(),
                    error: e.to_string(),
                }
                .emit();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;
    use cs_domain::error::{Error, Result};

    fn repo_with(entries: &[(&str, &str)]) -> LoadRepository {
        let store = MemoryKvStore::with_entries(entries.iter().map(|(k, v)| (*k, *v)));
        LoadRepository::new(Arc::new(store))
    }

    #[test]
    fn empty_store_yields_defaults() {
        let loaded = repo_with(&[]).load(1000);
        assert!(loaded.custom_types.is_empty());
        assert!(loaded.quantities.is_empty());
        assert_eq!(loaded.capacity, 1000);
    }

    #[test]
    fn each_record_falls_back_independently() {
        let repo = repo_with(&[
            (CUSTOM_TYPES_KEY, "not json"),
            (QUANTITIES_KEY, r#"{"box-1": 3}"#),
            (CAPACITY_KEY, "abc"),
        ]);
        let loaded = repo.load(1000);
        assert!(loaded.custom_types.is_empty());
        assert_eq!(loaded.quantities.get("box-1"), Some(&3));
        assert_eq!(loaded.capacity, 1000);
    }

    #[test]
    fn persisted_zero_capacity_is_clamped() {
        let loaded = repo_with(&[(CAPACITY_KEY, "0")]).load(1000);
        assert_eq!(loaded.capacity, 1);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let repo = repo_with(&[]);
        let tools = ContainerType::custom("custom-1".into(), "Tools".into(), 12.5);
        let mut q = QuantityMap::new();
        q.insert("custom-1".into(), 4);

        repo.save_custom_types(std::slice::from_ref(&tools));
        repo.save_quantities(&q);
        repo.save_capacity(640);

        let loaded = repo.load(1000);
        assert_eq!(loaded.custom_types, vec![tools]);
        assert_eq!(loaded.quantities, q);
        assert_eq!(loaded.capacity, 640);
    }

    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("device unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("device unavailable".into()))
        }
    }

    #[test]
    fn broken_store_never_fails_callers() {
        let repo = LoadRepository::new(Arc::new(BrokenStore));
        let loaded = repo.load(500);
        assert_eq!(loaded.capacity, 500);
        repo.save_capacity(10);
        repo.save_quantities(&QuantityMap::new());
    }
}
