#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return None; }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig { url, max_connections: 5, min_connections: 1, ..Default::default() })
}

/// Connection to a migrated test database, or `None` when none is available.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let Some(cfg) = test_config() else { return Ok(None) };

    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&cfg).await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    false
                }
            }
        })
        .await;
    if !migrated { return Ok(None); }

    // Return a fresh connection for the current test's runtime
    let db = connect_with_config(&cfg).await?;
    Ok(Some(db))
}
