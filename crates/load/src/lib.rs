//! Load state for CargaSegura.
//!
//! Owns the container catalog, the quantity map and the capacity limit,
//! derives totals from them, and persists every confirmed mutation to a
//! key-value substrate. [`LoadSession`] is the single entry point for user
//! commands; it publishes a [`LoadSnapshot`] after each change so the
//! advisory orchestrator can react.

pub mod catalog;
pub mod load;
pub mod persist;
pub mod session;
pub mod store;

pub use catalog::Catalog;
pub use load::{LoadLevel, LoadSnapshot, LoadState, QuantityMap};
pub use persist::{LoadRepository, PersistedLoad};
pub use session::{LoadSession, ResetRequest};
pub use store::{FileKvStore, KvStore, MemoryKvStore};
