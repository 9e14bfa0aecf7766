//! Connection pool construction and schema migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a PostgreSQL pool sized and timed from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(Some(config.idle_timeout()))
        .max_lifetime(Some(config.max_lifetime()))
        .connect(config.url.expose_secret())
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))?;

    info!(
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "Connected to database"
    );

    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Failed to run migrations", e))?;

    info!("Database migrations applied");
    Ok(())
}
