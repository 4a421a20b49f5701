use clap::Args;
use finance_ai::error::AppError;
use finance_ai::health::{assess, HealthReport};
use finance_ai::ledger::{sample_transactions, Transaction};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Transaction file: a JSON array, or the `{"transactions": [...]}` body
    /// returned by `GET /api/transactions`
    #[arg(long, conflicts_with = "sample")]
    pub(crate) file: Option<PathBuf>,
    /// Score the built-in sample ledger instead of a file
    #[arg(long)]
    pub(crate) sample: bool,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerDocument {
    Bare(Vec<Transaction>),
    Wrapped { transactions: Vec<Transaction> },
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { file, sample, json } = args;

    let transactions = match (file, sample) {
        (Some(path), _) => {
            let raw = std::fs::read_to_string(&path)?;
            let transactions = parse_ledger(&raw)?;
            debug!(path = %path.display(), count = transactions.len(), "loaded ledger file");
            transactions
        }
        (None, true) => sample_transactions(),
        (None, false) => {
            return Err(AppError::Input(
                "provide --file <path> or --sample".to_string(),
            ))
        }
    };

    let report = assess(&transactions);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report_lines(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn parse_ledger(raw: &str) -> Result<Vec<Transaction>, AppError> {
    let document: LedgerDocument = serde_json::from_str(raw)?;
    Ok(match document {
        LedgerDocument::Bare(transactions) => transactions,
        LedgerDocument::Wrapped { transactions } => transactions,
    })
}

pub(crate) fn report_lines(report: &HealthReport) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = vec![
        "Financial health report".to_string(),
        format!(
            "Score: {}/{} ({})",
            report.total_score, report.max_score, report.tier_label
        ),
        String::new(),
        "Summary".to_string(),
        format!("- Income: ฿{}", summary.income.normalize()),
        format!("- Expenses: ฿{}", summary.expenses.normalize()),
        format!("- Invested: ฿{}", summary.invest.normalize()),
        format!("- Net: ฿{}", summary.net.normalize()),
        format!("- Savings rate: {}%", summary.savings_rate),
        String::new(),
        "Metrics".to_string(),
    ];

    for metric in &report.metrics {
        lines.push(format!(
            "- {}: {}/{} [{}] {}",
            metric.label,
            metric.score,
            metric.max_score,
            metric.status.label(),
            metric.description
        ));
    }

    lines.push(String::new());
    if report.breakdown.is_empty() {
        lines.push("Spending by category: none".to_string());
    } else {
        lines.push("Spending by category".to_string());
        for entry in report.breakdown.entries() {
            lines.push(format!("- {}: ฿{}", entry.name, entry.value.normalize()));
        }
    }

    lines
}
