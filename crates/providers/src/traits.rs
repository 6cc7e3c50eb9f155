use cs_domain::error::Result;
use cs_domain::{AdvisoryResult, LoadSummary};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core oracle trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An external judge that turns a settled load into a safety advisory.
///
/// Implementations are free to take arbitrarily long or fail; the caller
/// owns staleness, timeouts and the fallback judgment.
#[async_trait::async_trait]
pub trait AdvisoryOracle: Send + Sync {
    /// Ask for a judgment of `summary`. Any failure (transport, non-2xx,
    /// malformed answer) is reported as an error, never as a partial result.
    async fn request_judgment(&self, summary: &LoadSummary) -> Result<AdvisoryResult>;

    /// A unique identifier for this oracle (used in logs and trace events).
    fn provider_id(&self) -> &str;
}
