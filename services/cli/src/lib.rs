mod cli;
mod commands;
mod infra;
mod render;

use duty_roster::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
