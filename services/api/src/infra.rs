use async_trait::async_trait;
use finance_ai::config::{IdentityConfig, LedgerConfig};
use finance_ai::error::AppError;
use finance_ai::identity::{
    AuthenticatedUser, IdentityError, IdentityProvider, RemoteIdentity, StaticIdentity,
};
use finance_ai::ledger::{
    InMemoryTransactionStore, JsonFileTransactionStore, RepositoryError, Transaction,
    TransactionRepository, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Storage backend chosen at startup.
pub(crate) enum LedgerStore {
    Memory(InMemoryTransactionStore),
    File(JsonFileTransactionStore),
}

impl LedgerStore {
    pub(crate) fn from_config(config: &LedgerConfig) -> Result<Self, AppError> {
        match &config.data_dir {
            Some(dir) => {
                let store = JsonFileTransactionStore::open(dir).map_err(|err| {
                    AppError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        err.to_string(),
                    ))
                })?;
                info!(data_dir = %store.root().display(), "using file-backed ledger");
                Ok(Self::File(store))
            }
            None => {
                warn!("LEDGER_DATA_DIR not set; transactions are kept in memory only");
                Ok(Self::Memory(InMemoryTransactionStore::default()))
            }
        }
    }
}

impl TransactionRepository for LedgerStore {
    fn list(&self, user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
        match self {
            Self::Memory(store) => store.list(user),
            Self::File(store) => store.list(user),
        }
    }

    fn create(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, RepositoryError> {
        match self {
            Self::Memory(store) => store.create(user, transaction),
            Self::File(store) => store.create(user, transaction),
        }
    }
}

/// Identity backend chosen at startup.
pub(crate) enum IdentityBackend {
    Remote(RemoteIdentity),
    Static(StaticIdentity),
}

impl IdentityBackend {
    pub(crate) fn from_config(config: &IdentityConfig) -> Self {
        match &config.user_url {
            Some(url) => {
                info!(user_url = %url, "resolving tokens against identity service");
                Self::Remote(RemoteIdentity::new(url.clone()))
            }
            None => {
                if config.dev_tokens.is_empty() {
                    warn!("no identity backend configured; every protected request is unauthorized");
                } else {
                    info!(tokens = config.dev_tokens.len(), "using static development tokens");
                }
                Self::Static(StaticIdentity::new(config.dev_tokens.clone()))
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityBackend {
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, IdentityError> {
        match self {
            Self::Remote(identity) => identity.resolve(token).await,
            Self::Static(identity) => identity.resolve(token).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn memory_store_is_the_default() {
        let store = LedgerStore::from_config(&LedgerConfig { data_dir: None }).expect("store");
        assert!(matches!(store, LedgerStore::Memory(_)));
        assert!(store
            .list(&UserId("anyone".to_string()))
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn static_tokens_back_identity_without_a_user_url() {
        let mut dev_tokens = HashMap::new();
        dev_tokens.insert(
            "dev".to_string(),
            AuthenticatedUser {
                user_id: UserId("user-dev".to_string()),
                email: "dev@example.test".to_string(),
            },
        );
        let backend = IdentityBackend::from_config(&IdentityConfig {
            user_url: None,
            dev_tokens,
        });

        assert!(matches!(backend, IdentityBackend::Static(_)));
        let user = backend
            .resolve("dev")
            .await
            .expect("lookup")
            .expect("known");
        assert_eq!(user.user_id, UserId("user-dev".to_string()));
    }

    #[test]
    fn user_url_selects_remote_identity() {
        let backend = IdentityBackend::from_config(&IdentityConfig {
            user_url: Some("http://127.0.0.1:9/user".to_string()),
            dev_tokens: HashMap::new(),
        });
        assert!(matches!(backend, IdentityBackend::Remote(_)));
    }
}
