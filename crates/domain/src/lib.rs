//! Shared types for the CargaSegura load assistant.

pub mod advisory;
pub mod config;
pub mod container;
pub mod error;
pub mod trace;

pub use advisory::{AdvisoryResult, AdvisoryStatus, LoadSummary, SummaryLine};
pub use container::ContainerType;
pub use error::{Error, InputError, Result};
