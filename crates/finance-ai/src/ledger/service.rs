use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::domain::{NewTransaction, Transaction, TransactionId, UserId};
use super::repository::{RepositoryError, TransactionRepository};
use super::validation::{self, ValidationError};
use crate::health::{self, HealthReport};

/// Service composing payload validation, id assignment, storage, and scoring.
pub struct LedgerService<R> {
    repository: Arc<R>,
}

fn next_transaction_id() -> TransactionId {
    TransactionId(Uuid::new_v4().to_string())
}

impl<R> LedgerService<R>
where
    R: TransactionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// The user's ledger, newest date first.
    pub fn list(&self, user: &UserId) -> Result<Vec<Transaction>, LedgerServiceError> {
        let transactions = self.repository.list(user)?;
        debug!(user = %user.0, count = transactions.len(), "listed transactions");
        Ok(transactions)
    }

    /// Record a validated transaction under a fresh id.
    pub fn create(
        &self,
        user: &UserId,
        input: NewTransaction,
    ) -> Result<Transaction, LedgerServiceError> {
        let transaction = input.into_transaction(next_transaction_id());
        let stored = self.repository.create(user, transaction)?;
        info!(
            user = %user.0,
            transaction = %stored.id.0,
            kind = stored.kind.as_str(),
            "transaction recorded"
        );
        Ok(stored)
    }

    /// Validate a raw request body and record it.
    pub fn create_from_payload(
        &self,
        user: &UserId,
        body: &[u8],
    ) -> Result<Transaction, LedgerServiceError> {
        let input = validation::parse_new_transaction(body)?;
        self.create(user, input)
    }

    /// Score the current snapshot of the user's ledger.
    pub fn health_report(&self, user: &UserId) -> Result<HealthReport, LedgerServiceError> {
        let transactions = self.list(user)?;
        Ok(health::assess(&transactions))
    }
}

/// Error raised by the ledger service.
#[derive(Debug, thiserror::Error)]
pub enum LedgerServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
