use std::sync::Arc;

use migration::MigratorTrait;
use tracing::info;

use configs::AppConfig;
use service::products::repo::seaorm::SeaOrmProductStore;
use service::products::ProductsService;

use crate::dispatch::RpcDispatcher;
use crate::errors::StartupError;
use crate::transport;

/// Connect the store, then the bus, then serve until the bus goes away.
/// Any failure before serving is returned and treated as fatal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let products = ProductsService::new(Arc::new(SeaOrmProductStore::new(db)));
    products
        .on_start()
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let dispatcher = Arc::new(RpcDispatcher::new(products));

    let client = transport::connect(&cfg.nats).await?;

    if let Some(addr) = &cfg.admin.addr {
        common::admin_http::spawn_admin_server(addr).await?;
    }

    info!(port = cfg.server.port, "Products Microservice Running on port {}", cfg.server.port);
    transport::serve(client, dispatcher, &cfg.nats.queue_group).await
}
