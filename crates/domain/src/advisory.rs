//! Structured safety judgments about the current load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a load advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryStatus {
    Safe,
    Warning,
    Danger,
}

impl AdvisoryStatus {
    pub const ALL: [AdvisoryStatus; 3] = [
        AdvisoryStatus::Safe,
        AdvisoryStatus::Warning,
        AdvisoryStatus::Danger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdvisoryStatus::Safe => "safe",
            AdvisoryStatus::Warning => "warning",
            AdvisoryStatus::Danger => "danger",
        }
    }
}

impl fmt::Display for AdvisoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A safety judgment: status, headline message and ordered tips.
///
/// Ephemeral: never persisted, recomputed per settled load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub status: AdvisoryStatus,
    pub message: String,
    pub tips: Vec<String>,
}

const FALLBACK_MESSAGE: &str = "Basic load analysis performed.";

const FALLBACK_TIPS: [&str; 3] = [
    "Distribute the weight evenly over the rear axle.",
    "Secure the boxes with straps to keep them from shifting.",
    "Increase your braking distance when carrying a heavy load.",
];

impl AdvisoryResult {
    /// Deterministic local judgment used when the oracle is unavailable.
    ///
    /// `danger` when the load exceeds capacity, `safe` otherwise.
    pub fn fallback(total_weight: f64, capacity: u64) -> Self {
        let status = if total_weight > capacity as f64 {
            AdvisoryStatus::Danger
        } else {
            AdvisoryStatus::Safe
        };
        Self {
            status,
            message: FALLBACK_MESSAGE.to_owned(),
            tips: FALLBACK_TIPS.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Load summary (oracle input)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One container type with a positive quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub label: String,
    pub quantity: u32,
    pub unit_weight: f64,
}

/// A settled load, as handed to the advisory oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    /// Lines in catalog order, only for quantities above zero.
    pub lines: Vec<SummaryLine>,
    pub total_weight: f64,
    pub capacity: u64,
}

impl LoadSummary {
    /// Load as a percentage of capacity.
    pub fn percentage(&self) -> f64 {
        self.total_weight / self.capacity.max(1) as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_under_capacity_is_safe() {
        let advice = AdvisoryResult::fallback(150.0, 1000);
        assert_eq!(advice.status, AdvisoryStatus::Safe);
        assert_eq!(advice.tips.len(), 3);
    }

    #[test]
    fn fallback_over_capacity_is_danger() {
        let advice = AdvisoryResult::fallback(600.0, 500);
        assert_eq!(advice.status, AdvisoryStatus::Danger);
    }

    #[test]
    fn fallback_at_exact_capacity_is_safe() {
        let advice = AdvisoryResult::fallback(500.0, 500);
        assert_eq!(advice.status, AdvisoryStatus::Safe);
    }

    #[test]
    fn summary_percentage() {
        let summary = LoadSummary {
            lines: vec![SummaryLine {
                label: "Large box".into(),
                quantity: 10,
                unit_weight: 15.0,
            }],
            total_weight: 150.0,
            capacity: 1000,
        };
        assert!((summary.percentage() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AdvisoryStatus::Warning).unwrap();
        assert_eq!(json, r#""warning""#);
        let parsed: AdvisoryStatus = serde_json::from_str(r#""danger""#).unwrap();
        assert_eq!(parsed, AdvisoryStatus::Danger);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<AdvisoryStatus>(r#""critical""#).is_err());
    }
}
