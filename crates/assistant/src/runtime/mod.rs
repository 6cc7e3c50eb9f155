pub mod advisor;
pub mod machine;

pub use advisor::{Advisor, AdvisorSettings};
pub use machine::{AdvisorPhase, AdvisorView};
