use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use tracing::debug;

use models::product;

use crate::products::domain::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::products::errors::ProductError;
use crate::products::repository::ProductStore;

/// SeaORM-backed store over the `product` table.
pub struct SeaOrmProductStore {
    pub db: DatabaseConnection,
}

impl SeaOrmProductStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: product::Model) -> Product {
    Product {
        id: m.id,
        name: m.name,
        price: m.price,
        available: m.available,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn filtered(filter: ProductFilter) -> Select<product::Entity> {
    let mut select = product::Entity::find();
    if let Some(id) = filter.id { select = select.filter(product::Column::Id.eq(id)); }
    if let Some(a) = filter.available { select = select.filter(product::Column::Available.eq(a)); }
    select
}

#[async_trait]
impl ProductStore for SeaOrmProductStore {
    async fn connect(&self) -> Result<(), ProductError> {
        models::db::ping(&self.db).await.map_err(|e| ProductError::Store(e.to_string()))
    }

    async fn create(&self, input: NewProduct) -> Result<Product, ProductError> {
        let now = Utc::now();
        let am = product::ActiveModel {
            name: Set(input.name),
            price: Set(input.price),
            available: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(to_domain(created))
    }

    async fn find_many(&self, filter: ProductFilter, skip: u64, take: u64) -> Result<Vec<Product>, ProductError> {
        let rows = filtered(filter)
            .order_by_asc(product::Column::Id)
            .offset(skip)
            .limit(take)
            .all(&self.db)
            .await?;
        debug!(count = rows.len(), skip, take, "find_many");
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_first(&self, filter: ProductFilter) -> Result<Option<Product>, ProductError> {
        let row = filtered(filter)
            .order_by_asc(product::Column::Id)
            .one(&self.db)
            .await?;
        Ok(row.map(to_domain))
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, ProductError> {
        let mut am = product::ActiveModel { id: Unchanged(id), ..Default::default() };
        if let Some(name) = changes.name { am.name = Set(name); }
        if let Some(price) = changes.price { am.price = Set(price); }
        if let Some(available) = changes.available { am.available = Set(available); }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await?;
        Ok(to_domain(updated))
    }

    async fn count(&self, filter: ProductFilter) -> Result<u64, ProductError> {
        Ok(filtered(filter).count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_store_round_trip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let store = SeaOrmProductStore::new(db);
        store.connect().await?;

        let created = store.create(NewProduct { name: "seaorm_store_item".into(), price: 3.5 }).await?;
        assert!(created.available);

        let found = store.find_first(ProductFilter::active_with_id(created.id)).await?;
        assert_eq!(found.map(|p| p.id), Some(created.id));

        let retired = store.update(created.id, ProductChanges { available: Some(false), ..Default::default() }).await?;
        assert!(!retired.available);
        assert_eq!(retired.name, "seaorm_store_item");

        let hidden = store.find_first(ProductFilter::active_with_id(created.id)).await?;
        assert!(hidden.is_none());
        let raw = store.find_first(ProductFilter { id: Some(created.id), available: None }).await?;
        assert!(raw.is_some());

        product::Entity::delete_by_id(created.id).exec(&store.db).await?;
        Ok(())
    }
}
