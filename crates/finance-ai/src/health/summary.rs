use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionKind};

/// Income and spending totals derived from a ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    /// Reported for context only; investments never enter a score.
    pub invest: Decimal,
    pub net: Decimal,
    /// Whole percent of income kept, `0` whenever there is no income.
    pub savings_rate: i64,
    pub income_entries: usize,
}

impl FinancialSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let income = total_of(transactions, TransactionKind::Income);
        let expenses = total_of(transactions, TransactionKind::Expense);
        let invest = total_of(transactions, TransactionKind::Invest);
        let net = income.saturating_sub(expenses);

        let savings_rate = if income > Decimal::ZERO {
            round_half_up(percent_of(net, income))
        } else {
            0
        };

        let income_entries = transactions
            .iter()
            .filter(|tx| tx.is(TransactionKind::Income))
            .count();

        Self {
            income,
            expenses,
            invest,
            net,
            savings_rate,
            income_entries,
        }
    }
}

fn total_of(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is(kind))
        .fold(Decimal::ZERO, |acc, tx| acc.saturating_add(tx.amount))
}

/// `part / whole * 100`, saturating instead of overflowing. Callers guard
/// against a zero `whole`.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            if part.is_sign_negative() != whole.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
}

/// Rounds half-way values toward positive infinity: `2.5 -> 3`, `-2.5 -> -2`.
pub(crate) fn round_half_up(value: Decimal) -> i64 {
    let rounded = value.saturating_add(Decimal::new(5, 1)).floor();
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
