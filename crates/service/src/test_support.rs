#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory SQLite database with the full schema applied.
/// A single pooled connection keeps the in-memory database alive across the
/// test; every caller gets its own isolated schema.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
