use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::domain::{Transaction, UserId};

/// Storage abstraction so the ledger service can be exercised in isolation.
pub trait TransactionRepository: Send + Sync {
    /// Point-in-time snapshot of a user's ledger, newest date first.
    fn list(&self, user: &UserId) -> Result<Vec<Transaction>, RepositoryError>;
    fn create(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("transaction already exists")]
    Conflict,
    #[error("transactions store unavailable: {0}")]
    Unavailable(String),
}

/// Inserts `transaction` ahead of the existing entries and re-sorts by date
/// descending. The sort is stable, so the new entry leads its date group.
pub(crate) fn insert_newest_first(ledger: &mut Vec<Transaction>, transaction: Transaction) {
    ledger.insert(0, transaction);
    ledger.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Process-local ledger storage.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransactionStore {
    ledgers: Arc<Mutex<HashMap<UserId, Vec<Transaction>>>>,
}

impl InMemoryTransactionStore {
    fn ledgers(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, Vec<Transaction>>>, RepositoryError>
    {
        self.ledgers
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ledger mutex poisoned".to_string()))
    }
}

impl TransactionRepository for InMemoryTransactionStore {
    fn list(&self, user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self.ledgers()?.get(user).cloned().unwrap_or_default())
    }

    fn create(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, RepositoryError> {
        let mut guard = self.ledgers()?;
        let ledger = guard.entry(user.clone()).or_default();
        if ledger.iter().any(|existing| existing.id == transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        insert_newest_first(ledger, transaction.clone());
        Ok(transaction)
    }
}

/// Keyed document store: one JSON array per user inside `root`.
#[derive(Debug)]
pub struct JsonFileTransactionStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileTransactionStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            RepositoryError::Unavailable(format!("cannot create {}: {err}", root.display()))
        })?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, user: &UserId) -> PathBuf {
        self.root.join(format!("transactions-{}.json", encode_key(&user.0)))
    }

    fn read(&self, user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
        let path = self.document_path(user);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(RepositoryError::Unavailable(format!(
                    "failed to read transactions store: {err}"
                )))
            }
        };

        let document: Value = serde_json::from_slice(&raw).map_err(|err| {
            RepositoryError::Unavailable(format!("failed to read transactions store: {err}"))
        })?;
        if !document.is_array() {
            return Ok(Vec::new());
        }
        serde_json::from_value(document).map_err(|err| {
            RepositoryError::Unavailable(format!("failed to read transactions store: {err}"))
        })
    }

    fn write(&self, user: &UserId, ledger: &[Transaction]) -> Result<(), RepositoryError> {
        let path = self.document_path(user);
        let staging = path.with_extension("json.tmp");
        let unavailable = |err: std::io::Error| {
            RepositoryError::Unavailable(format!("failed to write transactions store: {err}"))
        };

        let encoded = serde_json::to_vec_pretty(ledger).map_err(|err| {
            RepositoryError::Unavailable(format!("failed to encode transactions: {err}"))
        })?;
        fs::write(&staging, encoded).map_err(unavailable)?;
        fs::rename(&staging, &path).map_err(unavailable)
    }
}

impl TransactionRepository for JsonFileTransactionStore {
    fn list(&self, user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
        self.read(user)
    }

    fn create(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, RepositoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))?;

        let mut ledger = self.read(user)?;
        if ledger.iter().any(|existing| existing.id == transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        insert_newest_first(&mut ledger, transaction.clone());
        self.write(user, &ledger)?;
        Ok(transaction)
    }
}

/// File-name safe rendering of a user key; bytes outside `[A-Za-z0-9_-]` are
/// hex escaped so distinct ids never collide.
fn encode_key(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_key_escapes_path_separators() {
        assert_eq!(encode_key("user-1_a"), "user-1_a");
        assert_eq!(encode_key("../etc"), "%2E%2E%2Fetc");
        assert_ne!(encode_key("a/b"), encode_key("a_b"));
    }
}
