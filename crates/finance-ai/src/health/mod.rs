//! Financial health scoring.
//!
//! A ledger snapshot is reduced to a [`FinancialSummary`] and an
//! [`ExpenseBreakdown`]; four independent scorers read those (never the raw
//! transactions) and each award up to 25 points. The composite is their sum,
//! mapped onto an [`OverallTier`]. Everything here is pure: the same slice, in
//! any order, always yields the same report.

mod breakdown;
mod composite;
mod metrics;
mod summary;

#[cfg(test)]
mod tests;

pub use breakdown::{CategoryTotal, ExpenseBreakdown};
pub use composite::{total_score, OverallTier};
pub use metrics::{
    diversification_metric, expense_ratio_metric, income_consistency_metric,
    savings_rate_metric, HealthMetric, MetricKind, MetricStatus, ScoreSignals, METRIC_MAX_SCORE,
};
pub use summary::FinancialSummary;

use serde::Serialize;

use crate::ledger::Transaction;

/// Upper bound of the composite score.
pub const MAX_TOTAL_SCORE: u8 = 100;

/// Complete scoring result for one ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub summary: FinancialSummary,
    pub breakdown: ExpenseBreakdown,
    pub signals: ScoreSignals,
    pub metrics: Vec<HealthMetric>,
    pub total_score: u8,
    pub max_score: u8,
    pub tier: OverallTier,
    pub tier_label: &'static str,
}

impl HealthReport {
    pub fn metric(&self, kind: MetricKind) -> Option<&HealthMetric> {
        self.metrics.iter().find(|metric| metric.kind == kind)
    }

    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.breakdown.top()
    }
}

/// Score a ledger snapshot.
pub fn assess(transactions: &[Transaction]) -> HealthReport {
    let summary = FinancialSummary::from_transactions(transactions);
    let breakdown = ExpenseBreakdown::from_transactions(transactions);
    let signals = ScoreSignals::derive(&summary, &breakdown);
    let metrics = signals.metrics();
    let total_score = total_score(&metrics);
    let tier = OverallTier::for_score(total_score);

    HealthReport {
        summary,
        breakdown,
        signals,
        metrics,
        total_score,
        max_score: MAX_TOTAL_SCORE,
        tier,
        tier_label: tier.label(),
    }
}
