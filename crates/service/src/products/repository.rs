use async_trait::async_trait;

use super::domain::{NewProduct, Product, ProductChanges, ProductFilter};
use super::errors::ProductError;

/// Data-access seam for the catalog.
///
/// Rows come back ordered by id. A store never physically deletes.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Establish or verify the connection. Called once before serving.
    async fn connect(&self) -> Result<(), ProductError> { Ok(()) }

    async fn create(&self, input: NewProduct) -> Result<Product, ProductError>;
    async fn find_many(&self, filter: ProductFilter, skip: u64, take: u64) -> Result<Vec<Product>, ProductError>;
    async fn find_first(&self, filter: ProductFilter) -> Result<Option<Product>, ProductError>;
    /// Apply `changes` to the row with `id` regardless of its availability.
    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, ProductError>;
    async fn count(&self, filter: ProductFilter) -> Result<u64, ProductError>;
}

/// In-memory store for tests, doc examples and benchmarks.
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct InMemoryProductStore {
        rows: Mutex<BTreeMap<i32, Product>>, // key: id, iteration order = id order
        next_id: Mutex<i32>,
    }

    impl InMemoryProductStore {
        pub fn new() -> Self { Self::default() }

        fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<i32, Product>>, ProductError> {
            self.rows.lock().map_err(|_| ProductError::Store("in-memory store poisoned".into()))
        }

        /// Row lookup that ignores availability.
        pub fn get_raw(&self, id: i32) -> Option<Product> {
            self.rows.lock().ok().and_then(|rows| rows.get(&id).cloned())
        }
    }

    #[async_trait]
    impl ProductStore for InMemoryProductStore {
        async fn create(&self, input: NewProduct) -> Result<Product, ProductError> {
            let mut rows = self.rows()?;
            let mut next = self.next_id.lock().map_err(|_| ProductError::Store("in-memory store poisoned".into()))?;
            *next += 1;
            let now = Utc::now();
            let product = Product {
                id: *next,
                name: input.name,
                price: input.price,
                available: true,
                created_at: now,
                updated_at: now,
            };
            rows.insert(product.id, product.clone());
            Ok(product)
        }

        async fn find_many(&self, filter: ProductFilter, skip: u64, take: u64) -> Result<Vec<Product>, ProductError> {
            let rows = self.rows()?;
            Ok(rows
                .values()
                .filter(|p| filter.matches(p))
                .skip(usize::try_from(skip).unwrap_or(usize::MAX))
                .take(usize::try_from(take).unwrap_or(usize::MAX))
                .cloned()
                .collect())
        }

        async fn find_first(&self, filter: ProductFilter) -> Result<Option<Product>, ProductError> {
            let rows = self.rows()?;
            Ok(rows.values().find(|p| filter.matches(p)).cloned())
        }

        async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, ProductError> {
            let mut rows = self.rows()?;
            let row = rows
                .get_mut(&id)
                .ok_or_else(|| ProductError::Store(format!("record with id {id} does not exist")))?;
            changes.apply(row);
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn count(&self, filter: ProductFilter) -> Result<u64, ProductError> {
            let rows = self.rows()?;
            Ok(rows.values().filter(|p| filter.matches(p)).count() as u64)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn new_product(name: &str, price: f64) -> NewProduct {
            NewProduct { name: name.into(), price }
        }

        #[tokio::test]
        async fn ids_are_sequential_from_one() {
            let store = InMemoryProductStore::new();
            let a = store.create(new_product("A", 1.0)).await.unwrap();
            let b = store.create(new_product("B", 2.0)).await.unwrap();
            assert_eq!((a.id, b.id), (1, 2));
            assert!(a.available && b.available);
        }

        #[tokio::test]
        async fn find_many_skips_and_takes_in_id_order() {
            let store = InMemoryProductStore::new();
            for i in 0..5 {
                store.create(new_product(&format!("P{i}"), i as f64)).await.unwrap();
            }
            let page = store.find_many(ProductFilter::active(), 2, 2).await.unwrap();
            let ids: Vec<i32> = page.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![3, 4]);
        }

        #[tokio::test]
        async fn update_of_unknown_row_is_a_store_error() {
            let store = InMemoryProductStore::new();
            let err = store.update(9, ProductChanges::default()).await.unwrap_err();
            assert!(matches!(err, ProductError::Store(_)));
        }

        #[tokio::test]
        async fn count_respects_filter() {
            let store = InMemoryProductStore::new();
            let a = store.create(new_product("A", 1.0)).await.unwrap();
            store.create(new_product("B", 1.0)).await.unwrap();
            store.update(a.id, ProductChanges { available: Some(false), ..Default::default() }).await.unwrap();
            assert_eq!(store.count(ProductFilter::active()).await.unwrap(), 1);
            assert_eq!(store.count(ProductFilter::default()).await.unwrap(), 2);
        }
    }
}
