use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionKind};

/// Summed expense amount for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

/// Expense totals grouped by raw category label, largest first. Equal totals
/// keep the order in which their category first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpenseBreakdown {
    entries: Vec<CategoryTotal>,
}

impl ExpenseBreakdown {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut grouped: Vec<(usize, CategoryTotal)> = Vec::new();

        for tx in transactions.iter().filter(|tx| tx.is(TransactionKind::Expense)) {
            match positions.get(tx.category.as_str()) {
                Some(&position) => {
                    let total = &mut grouped[position].1;
                    total.value = total.value.saturating_add(tx.amount);
                }
                None => {
                    positions.insert(tx.category.as_str(), grouped.len());
                    grouped.push((
                        grouped.len(),
                        CategoryTotal {
                            name: tx.category.clone(),
                            value: tx.amount,
                        },
                    ));
                }
            }
        }

        grouped.sort_by(|(first_seen_a, a), (first_seen_b, b)| {
            b.value
                .cmp(&a.value)
                .then_with(|| first_seen_a.cmp(first_seen_b))
        });

        Self {
            entries: grouped.into_iter().map(|(_, total)| total).collect(),
        }
    }

    pub fn entries(&self) -> &[CategoryTotal] {
        &self.entries
    }

    /// The top expense category, if any expense was recorded.
    pub fn top(&self) -> Option<&CategoryTotal> {
        self.entries.first()
    }

    pub fn category_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
