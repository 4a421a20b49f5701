use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{Transaction, TransactionId, TransactionKind};

pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Allowance", "Freelance", "Bonus", "Other"];
pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Education",
    "Ent.",
    "Rent",
];
pub const INVEST_CATEGORIES: [&str; 4] = ["Mutual Fund", "Stocks", "Crypto", "Savings"];

/// Suggested categories for entry forms. Nothing downstream validates against
/// these lists.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCatalog {
    pub income: &'static [&'static str],
    pub expense: &'static [&'static str],
    pub invest: &'static [&'static str],
}

impl CategoryCatalog {
    pub fn standard() -> Self {
        Self {
            income: &INCOME_CATEGORIES,
            expense: &EXPENSE_CATEGORIES,
            invest: &INVEST_CATEGORIES,
        }
    }

    pub fn for_kind(&self, kind: TransactionKind) -> &'static [&'static str] {
        match kind {
            TransactionKind::Income => self.income,
            TransactionKind::Expense => self.expense,
            TransactionKind::Invest => self.invest,
        }
    }
}

/// One month of a student's ledger, used by demos and smoke tests.
pub fn sample_transactions() -> Vec<Transaction> {
    let entry = |id: &str, kind, amount: i64, category: &str, day: u32, note: &str| Transaction {
        id: TransactionId(id.to_string()),
        kind,
        amount: Decimal::from(amount),
        category: category.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap_or_default(),
        note: note.to_string(),
    };

    vec![
        entry("1", TransactionKind::Income, 12500, "Salary", 1, "Monthly Salary"),
        entry("2", TransactionKind::Expense, 2870, "Food", 5, "Groceries"),
        entry("3", TransactionKind::Expense, 2050, "Rent", 2, "Apartment"),
        entry("4", TransactionKind::Expense, 1640, "Transport", 10, "Fuel"),
        entry("5", TransactionKind::Expense, 820, "Utilities", 12, "Electricity"),
        entry("6", TransactionKind::Expense, 820, "Ent.", 15, "Cinema"),
    ]
}
