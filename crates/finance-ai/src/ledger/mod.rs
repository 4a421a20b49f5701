//! Transaction ledger: domain types, payload validation, storage backends, and
//! the service facade the HTTP layer calls.

pub mod catalog;
pub mod domain;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{sample_transactions, CategoryCatalog};
pub use domain::{NewTransaction, Transaction, TransactionId, TransactionKind, UserId};
pub use repository::{
    InMemoryTransactionStore, JsonFileTransactionStore, RepositoryError, TransactionRepository,
};
pub use service::{LedgerService, LedgerServiceError};
pub use validation::ValidationError;
