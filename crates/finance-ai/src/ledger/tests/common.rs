use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{
    InMemoryTransactionStore, LedgerService, NewTransaction, RepositoryError, Transaction,
    TransactionKind, TransactionRepository, UserId,
};

pub(super) fn user() -> UserId {
    UserId("user-123".to_string())
}

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

pub(super) fn new_transaction(
    kind: TransactionKind,
    amount: i64,
    category: &str,
    day: u32,
) -> NewTransaction {
    NewTransaction {
        kind,
        amount: Decimal::from(amount),
        category: category.to_string(),
        date: date(day),
        note: None,
    }
}

pub(super) fn build_service() -> (
    LedgerService<InMemoryTransactionStore>,
    Arc<InMemoryTransactionStore>,
) {
    let repository = Arc::new(InMemoryTransactionStore::default());
    let service = LedgerService::new(repository.clone());
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl TransactionRepository for UnavailableRepository {
    fn list(&self, _user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("blob store offline".to_string()))
    }

    fn create(
        &self,
        _user: &UserId,
        _transaction: Transaction,
    ) -> Result<Transaction, RepositoryError> {
        Err(RepositoryError::Unavailable("blob store offline".to_string()))
    }
}
