//! Create `product` table.
//!
//! Rows are never physically removed by the service; `available = false`
//! marks a soft-deleted product.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 255).not_null())
                    .col(double(Product::Price).not_null())
                    .col(boolean(Product::Available).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Product::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Product::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Product {
    Table,
    Id,
    Name,
    Price,
    Available,
    CreatedAt,
    UpdatedAt,
}
