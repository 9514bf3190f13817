//! Index the soft-delete flag; every read path filters on it.
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_product::Product;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_product_available")
                    .table(Product::Table)
                    .col(Product::Available)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_available").table(Product::Table).to_owned())
            .await
    }
}
