//! Oracle used when no remote advisor is available.

use cs_domain::error::{Error, Result};
use cs_domain::{AdvisoryResult, LoadSummary};

use crate::traits::AdvisoryOracle;

/// Always fails, so every settled load ends in the local fallback judgment.
pub struct FallbackOracle {
    reason: String,
}

impl FallbackOracle {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait::async_trait]
impl AdvisoryOracle for FallbackOracle {
    async fn request_judgment(&self, _summary: &LoadSummary) -> Result<AdvisoryResult> {
        Err(Error::Provider {
            provider: "fallback".into(),
            message: self.reason.clone(),
        })
    }

    fn provider_id(&self) -> &str {
        "fallback"
    }
}
