use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of the authenticated owner of a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Server-assigned transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

/// Closed set of movements a user can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Invest,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [Self::Income, Self::Expense, Self::Invest];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Invest => "invest",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

/// A recorded ledger entry. Amounts are exact decimals in the ledger's single
/// implicit currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    pub fn is(&self, kind: TransactionKind) -> bool {
        self.kind == kind
    }
}

/// Validated input for a new transaction; the id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            date: self.date,
            note: self.note.unwrap_or_default(),
        }
    }
}
