//! Personal finance ledger, financial health scoring, and the collaborator
//! boundaries (identity, storage, AI advisor) the HTTP service is built from.

pub mod assistant;
pub mod config;
pub mod error;
pub mod health;
pub mod identity;
pub mod ledger;
pub mod router;
pub mod telemetry;

pub use health::{assess, HealthReport};
pub use router::{finance_router, FinanceApp};
