//! Migrator for the products schema.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_product;
mod m20240101_000002_add_product_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_product::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000002_add_product_indexes::Migration),
        ]
    }
}
