mod cli;
mod infra;
mod plan;
mod prepare;
mod routes;
mod server;

use stockflow::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
