use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    tracing::info!(target: "rollup::migration", "Running database migrations.");
    cli::run_cli(rollup_batch_migration::Migrator).await;
    tracing::info!(target: "rollup::migration", "Database migrations complete.")
}
