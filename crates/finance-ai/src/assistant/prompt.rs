//! Prompt construction. Prompts only ever see derived figures from a
//! [`HealthReport`], never raw transactions.

use rust_decimal::Decimal;
use serde_json::json;

use crate::health::HealthReport;

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a helpful AI Financial Analyst specialized in \
helping students manage their money. You speak Thai primarily. Be encouraging, precise, and \
professional.";

/// `Income: ฿50000, Expenses: ฿13300, Net: ฿36700, Savings: 73%`
pub fn insight_summary(report: &HealthReport) -> String {
    let summary = &report.summary;
    format!(
        "Income: ฿{}, Expenses: ฿{}, Net: ฿{}, Savings: {}%",
        summary.income.normalize(),
        summary.expenses.normalize(),
        summary.net.normalize(),
        summary.savings_rate
    )
}

pub fn insight_prompt(report: &HealthReport) -> String {
    format!(
        "Based on this financial summary: \"{}\", provide a single, short, actionable advice for \
a student in Thai language. Start with \"AI Insight: \".",
        insight_summary(report)
    )
}

/// Compact JSON digest of the report for the deep analysis prompt.
pub fn analysis_digest(report: &HealthReport) -> String {
    let summary = &report.summary;
    let (top_name, top_amount) = match report.top_category() {
        Some(top) => (top.name.as_str(), top.value),
        None => ("N/A", Decimal::ZERO),
    };
    let metrics = report
        .metrics
        .iter()
        .map(|metric| format!("{}: {}/{}", metric.label, metric.score, metric.max_score))
        .collect::<Vec<_>>()
        .join(", ");

    json!({
        "income": summary.income.normalize(),
        "expenses": summary.expenses.normalize(),
        "net": summary.net.normalize(),
        "savingsRate": summary.savings_rate,
        "totalScore": report.total_score,
        "topCategory": top_name,
        "topCategoryAmount": top_amount.normalize(),
        "categoryCount": report.breakdown.category_count(),
        "metrics": metrics,
    })
    .to_string()
}

pub fn analysis_prompt(report: &HealthReport) -> String {
    format!(
        "You are a financial advisor for students. Here is a financial health summary: {}. \
Write a short analysis in Thai (3-5 sentences) that explains the overall score of {}/{}, \
names the weakest metric and gives two concrete steps to improve it.",
        analysis_digest(report),
        report.total_score,
        report.max_score
    )
}
