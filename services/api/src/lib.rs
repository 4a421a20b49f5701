mod cli;
mod infra;
mod report;
mod routes;
mod server;

use finance_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
