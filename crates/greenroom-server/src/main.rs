//! Greenroom Server — provisioning entry point.
//!
//! Connects to SurrealDB, applies schema migrations, and seeds the
//! default role-grant matrix for the marketplace roles. Safe to re-run:
//! migrations are idempotent and seeding replaces each role's defaults
//! wholesale.

use greenroom_db::repository::SurrealRoleGrantRepository;
use greenroom_db::{DbConfig, DbManager, run_migrations};
use tracing_subscriber::EnvFilter;

mod seed;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("greenroom=info".parse().unwrap()),
        )
        .json()
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Provisioning failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting Greenroom provisioning...");

    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;

    run_migrations(manager.client()).await?;

    let role_grants = SurrealRoleGrantRepository::new(manager.client().clone());
    seed::apply(&role_grants).await?;

    tracing::info!("Greenroom provisioning complete.");
    Ok(())
}
