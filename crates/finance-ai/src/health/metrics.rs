use rust_decimal::Decimal;
use serde::Serialize;

use super::breakdown::ExpenseBreakdown;
use super::summary::{percent_of, round_half_up, FinancialSummary};

/// Every metric is worth at most this many points.
pub const METRIC_MAX_SCORE: u8 = 25;

/// The four dimensions of the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    SavingsRate,
    ExpenseRatio,
    Diversification,
    IncomeConsistency,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        Self::SavingsRate,
        Self::ExpenseRatio,
        Self::Diversification,
        Self::IncomeConsistency,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SavingsRate => "อัตราการออม",
            Self::ExpenseRatio => "สัดส่วนรายจ่าย",
            Self::Diversification => "การกระจายค่าใช้จ่าย",
            Self::IncomeConsistency => "ความสม่ำเสมอของรายรับ",
        }
    }
}

/// Severity bucket of a single metric, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Warning,
    Danger,
}

impl MetricStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }
}

/// One scored dimension with a rendered explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthMetric {
    pub kind: MetricKind,
    pub label: &'static str,
    pub score: u8,
    pub max_score: u8,
    pub status: MetricStatus,
    pub description: String,
}

impl HealthMetric {
    fn new(kind: MetricKind, score: u8, status: MetricStatus, description: String) -> Self {
        Self {
            kind,
            label: kind.label(),
            score: score.min(METRIC_MAX_SCORE),
            max_score: METRIC_MAX_SCORE,
            status,
            description,
        }
    }
}

/// Inputs the four scorers read, derived from the summary and breakdown only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSignals {
    pub savings_rate: i64,
    /// Expenses as a percent of income; `100` when there is no income.
    pub expense_ratio: Decimal,
    pub category_count: usize,
    /// Top category as a percent of expenses; `100` when nothing was spent.
    pub top_category_share: Decimal,
    pub income_entries: usize,
}

impl ScoreSignals {
    pub fn derive(summary: &FinancialSummary, breakdown: &ExpenseBreakdown) -> Self {
        let expense_ratio = if summary.income > Decimal::ZERO {
            percent_of(summary.expenses, summary.income)
        } else {
            Decimal::ONE_HUNDRED
        };

        let top_category_share = match breakdown.top() {
            Some(top) if summary.expenses > Decimal::ZERO => {
                percent_of(top.value, summary.expenses)
            }
            _ => Decimal::ONE_HUNDRED,
        };

        Self {
            savings_rate: summary.savings_rate,
            expense_ratio,
            category_count: breakdown.category_count(),
            top_category_share,
            income_entries: summary.income_entries,
        }
    }

    /// All four metrics in display order.
    pub fn metrics(&self) -> Vec<HealthMetric> {
        vec![
            savings_rate_metric(self.savings_rate),
            expense_ratio_metric(self.expense_ratio),
            diversification_metric(self.category_count, self.top_category_share),
            income_consistency_metric(self.income_entries),
        ]
    }
}

pub fn savings_rate_metric(savings_rate: i64) -> HealthMetric {
    let (score, status) = if savings_rate >= 20 {
        (25, MetricStatus::Excellent)
    } else if savings_rate >= 10 {
        (18, MetricStatus::Good)
    } else if savings_rate >= 5 {
        (10, MetricStatus::Warning)
    } else {
        let doubled = savings_rate.saturating_mul(2).clamp(0, METRIC_MAX_SCORE.into());
        (doubled as u8, MetricStatus::Danger)
    };

    let remark = if savings_rate >= 20 {
        " — ยอดเยี่ยม!"
    } else if savings_rate >= 10 {
        " — ดีมาก"
    } else {
        " — ควรเพิ่มการออม"
    };

    HealthMetric::new(
        MetricKind::SavingsRate,
        score,
        status,
        format!("ออมได้ {savings_rate}% ของรายรับ{remark}"),
    )
}

pub fn expense_ratio_metric(expense_ratio: Decimal) -> HealthMetric {
    let fifty = Decimal::from(50);
    let seventy = Decimal::from(70);
    let eighty_five = Decimal::from(85);

    let (score, status) = if expense_ratio <= fifty {
        (25, MetricStatus::Excellent)
    } else if expense_ratio <= seventy {
        (20, MetricStatus::Good)
    } else if expense_ratio <= eighty_five {
        (12, MetricStatus::Warning)
    } else {
        (5, MetricStatus::Danger)
    };

    let remark = if expense_ratio <= fifty {
        " — ควบคุมได้ดีมาก"
    } else if expense_ratio <= seventy {
        " — อยู่ในเกณฑ์ดี"
    } else {
        " — ค่อนข้างสูง"
    };

    HealthMetric::new(
        MetricKind::ExpenseRatio,
        score,
        status,
        format!(
            "ใช้จ่าย {}% ของรายรับ{remark}",
            round_half_up(expense_ratio)
        ),
    )
}

pub fn diversification_metric(category_count: usize, top_category_share: Decimal) -> HealthMetric {
    let forty = Decimal::from(40);
    let fifty = Decimal::from(50);

    let (score, status) = if category_count >= 4 && top_category_share < forty {
        (25, MetricStatus::Excellent)
    } else if category_count >= 3 && top_category_share < fifty {
        (18, MetricStatus::Good)
    } else if category_count >= 2 {
        (12, MetricStatus::Warning)
    } else {
        (5, MetricStatus::Danger)
    };

    let remark = if top_category_share < forty {
        " — กระจายดี"
    } else {
        " — กระจุกตัวมากไป"
    };

    HealthMetric::new(
        MetricKind::Diversification,
        score,
        status,
        format!("มี {category_count} หมวดหมู่{remark}"),
    )
}

pub fn income_consistency_metric(income_entries: usize) -> HealthMetric {
    let (score, status) = match income_entries {
        0 => (0, MetricStatus::Danger),
        1 => (12, MetricStatus::Warning),
        2 => (18, MetricStatus::Good),
        _ => (25, MetricStatus::Excellent),
    };

    let remark = if income_entries >= 3 {
        " — สม่ำเสมอดี"
    } else {
        " — ลองบันทึกให้ถี่ขึ้น"
    };

    HealthMetric::new(
        MetricKind::IncomeConsistency,
        score,
        status,
        format!("บันทึกรายรับ {income_entries} รายการ{remark}"),
    )
}
