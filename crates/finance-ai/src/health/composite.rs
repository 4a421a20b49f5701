use serde::Serialize;

use super::metrics::HealthMetric;

/// Qualitative reading of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl OverallTier {
    pub fn for_score(total_score: u8) -> Self {
        if total_score >= 80 {
            Self::Excellent
        } else if total_score >= 60 {
            Self::Good
        } else if total_score >= 40 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "ยอดเยี่ยม",
            Self::Good => "ดี",
            Self::Fair => "พอใช้",
            Self::Poor => "ต้องปรับปรุง",
        }
    }
}

/// Sum of the metric scores. Each metric is capped at 25, so four of them
/// never exceed 100.
pub fn total_score(metrics: &[HealthMetric]) -> u8 {
    metrics
        .iter()
        .fold(0u8, |total, metric| total.saturating_add(metric.score))
}
