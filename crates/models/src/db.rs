use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use log::LevelFilter;

pub use configs::DatabaseConfig;

/// Translate the validated config into SeaORM pool options.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(cfg.connect_timeout())
        .acquire_timeout(cfg.acquire_timeout())
        .idle_timeout(cfg.idle_timeout())
        .max_lifetime(cfg.max_lifetime())
        .sqlx_logging(cfg.sqlx_logging)
        .sqlx_logging_level(LevelFilter::Debug);
    opts
}

pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(url).await?;
    Ok(db)
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(cfg)).await?;
    Ok(db)
}

/// Round-trip a trivial query to prove the pool can hand out a live connection.
pub async fn ping(db: &DatabaseConnection) -> anyhow::Result<()> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_string());
    db.query_one(stmt).await?;
    Ok(())
}
