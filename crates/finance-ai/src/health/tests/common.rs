use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{Transaction, TransactionId, TransactionKind};

pub(super) fn tx(kind: TransactionKind, amount: i64, category: &str) -> Transaction {
    tx_at(kind, Decimal::from(amount), category, 1)
}

pub(super) fn tx_at(
    kind: TransactionKind,
    amount: Decimal,
    category: &str,
    day: u32,
) -> Transaction {
    Transaction {
        id: TransactionId(format!("{}-{category}-{amount}-{day}", kind.as_str())),
        kind,
        amount,
        category: category.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date"),
        note: String::new(),
    }
}

pub(super) fn income(amount: i64) -> Transaction {
    tx(TransactionKind::Income, amount, "Salary")
}

pub(super) fn expense(amount: i64, category: &str) -> Transaction {
    tx(TransactionKind::Expense, amount, category)
}

pub(super) fn invest(amount: i64) -> Transaction {
    tx(TransactionKind::Invest, amount, "Stocks")
}

/// Three salary entries and four spending categories, the top one exactly
/// half of all spending.
pub(super) fn reference_ledger() -> Vec<Transaction> {
    vec![
        income(1000),
        income(1000),
        income(1000),
        expense(400, "Food"),
        expense(200, "Transport"),
        expense(100, "Rent"),
        expense(100, "Bills"),
    ]
}

/// Ledgers of different shapes used by the property checks.
pub(super) fn ledger_corpus() -> Vec<Vec<Transaction>> {
    vec![
        Vec::new(),
        reference_ledger(),
        crate::ledger::sample_transactions(),
        vec![expense(500, "Food"), expense(250, "Food")],
        vec![income(100), expense(950, "Rent"), invest(4000)],
        vec![
            income(4000),
            income(3500),
            expense(300, "Food"),
            expense(300, "Transport"),
            expense(300, "Bills"),
            expense(300, "Ent."),
            expense(299, "Shopping"),
        ],
        vec![
            tx_at(TransactionKind::Income, Decimal::new(1, 1), "Gift", 3),
            tx_at(TransactionKind::Income, Decimal::new(2, 1), "Gift", 4),
            tx_at(TransactionKind::Expense, Decimal::new(3, 1), "Snacks", 5),
            tx_at(TransactionKind::Expense, Decimal::new(7, 2), "Bus", 6),
        ],
    ]
}

/// Deterministic reorderings of `ledger`: reversed and every rotation.
pub(super) fn permutations_of(ledger: &[Transaction]) -> Vec<Vec<Transaction>> {
    let mut orders = Vec::new();
    let mut reversed = ledger.to_vec();
    reversed.reverse();
    orders.push(reversed);
    for shift in 1..ledger.len() {
        let mut rotated = ledger.to_vec();
        rotated.rotate_left(shift);
        orders.push(rotated);
    }
    orders
}
