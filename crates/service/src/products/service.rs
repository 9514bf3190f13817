use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{CreateProductInput, PageMeta, Paginated, Product, ProductChanges, ProductFilter, UpdateProductInput};
use super::errors::ProductError;
use super::repository::ProductStore;
use crate::pagination::Pagination;

/// Product catalog operations over a [`ProductStore`].
///
/// Only active products are visible; removal is a soft delete. The service
/// keeps no state between calls.
pub struct ProductsService<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> Clone for ProductsService<S> {
    fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: ProductStore> ProductsService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    pub fn store(&self) -> &Arc<S> { &self.store }

    /// Startup hook: the store must be reachable before any call is served.
    pub async fn on_start(&self) -> Result<(), ProductError> {
        self.store.connect().await?;
        info!("Database connected");
        Ok(())
    }

    /// Insert a product; it starts out available.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::products::{ProductsService, CreateProductInput, repository::memory::InMemoryProductStore};
    /// let svc = ProductsService::new(Arc::new(InMemoryProductStore::new()));
    /// let p = tokio_test::block_on(svc.create(CreateProductInput { name: "A".into(), price: 10.0 })).unwrap();
    /// assert_eq!(p.id, 1);
    /// assert!(p.available);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, ProductError> {
        let created = self.store.create(input.into()).await?;
        info!(id = created.id, "product_created");
        Ok(created)
    }

    /// One page of active products plus totals.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::pagination::Pagination;
    /// use service::products::{ProductsService, CreateProductInput, repository::memory::InMemoryProductStore};
    /// let svc = ProductsService::new(Arc::new(InMemoryProductStore::new()));
    /// for i in 0..5 {
    ///     tokio_test::block_on(svc.create(CreateProductInput { name: format!("P{i}"), price: 1.0 })).unwrap();
    /// }
    /// let page = tokio_test::block_on(svc.find_all(Pagination::new(3, 2).unwrap())).unwrap();
    /// assert_eq!(page.data.len(), 1);
    /// assert_eq!(page.data[0].id, 5);
    /// assert_eq!(page.meta.total, 5);
    /// assert_eq!(page.meta.last_page, 3);
    /// ```
    #[instrument(skip(self), fields(page = pagination.page, limit = pagination.limit))]
    pub async fn find_all(&self, pagination: Pagination) -> Result<Paginated<Product>, ProductError> {
        let total = self.store.count(ProductFilter::active()).await?;
        let data = self
            .store
            .find_many(ProductFilter::active(), pagination.skip(), pagination.take())
            .await?;
        debug!(total, returned = data.len(), "products_listed");
        Ok(Paginated {
            data,
            meta: PageMeta {
                total,
                page: pagination.page,
                last_page: pagination.last_page(total),
            },
        })
    }

    /// Active product by id, or `NotFound`.
    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i32) -> Result<Product, ProductError> {
        self.store
            .find_first(ProductFilter::active_with_id(id))
            .await?
            .ok_or_else(|| ProductError::not_found(id))
    }

    /// Partial update of an active product. An `id` inside the patch is ignored.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: UpdateProductInput) -> Result<Product, ProductError> {
        let current = self.find_one(id).await?;
        current
            .availability()
            .update()
            .map_err(|_| ProductError::not_found(id))?;
        let updated = self.store.update(id, patch.into_changes()).await?;
        info!(id, "product_updated");
        Ok(updated)
    }

    /// Soft delete: flips `available` to false and returns the stored row.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<Product, ProductError> {
        let current = self.find_one(id).await?;
        let next = current
            .availability()
            .retire()
            .map_err(|_| ProductError::not_found(id))?;
        let removed = self.store.update(id, ProductChanges::availability(next)).await?;
        info!(id, "product_removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repository::memory::InMemoryProductStore;

    fn svc() -> ProductsService<InMemoryProductStore> {
        ProductsService::new(Arc::new(InMemoryProductStore::new()))
    }

    fn input(name: &str, price: f64) -> CreateProductInput {
        CreateProductInput { name: name.into(), price }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids_and_defaults_available() {
        let svc = svc();
        let a = svc.create(input("A", 10.0)).await.unwrap();
        let b = svc.create(input("B", 11.0)).await.unwrap();
        assert!(a.available && b.available);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn remove_lifecycle_scenario() {
        let svc = svc();
        let p = svc.create(input("A", 10.0)).await.unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(svc.find_one(1).await.unwrap().name, "A");

        let removed = svc.remove(1).await.unwrap();
        assert!(!removed.available);
        assert_eq!(removed.name, "A");

        let err = svc.find_one(1).await.unwrap_err();
        assert_eq!(err, ProductError::not_found(1));
        assert!(err.to_string().contains("id 1"));

        let patch = UpdateProductInput { price: Some(20.0), ..Default::default() };
        assert_eq!(svc.update(1, patch).await.unwrap_err(), ProductError::not_found(1));

        // Row is still stored with the old price and stays inactive.
        let raw = svc.store().get_raw(1).unwrap();
        assert!(!raw.available);
        assert_eq!(raw.price, 10.0);
    }

    #[tokio::test]
    async fn repeated_remove_reports_not_found() {
        let svc = svc();
        svc.create(input("A", 1.0)).await.unwrap();
        svc.remove(1).await.unwrap();
        assert_eq!(svc.remove(1).await.unwrap_err(), ProductError::not_found(1));
        assert_eq!(svc.find_one(1).await.unwrap_err(), ProductError::not_found(1));
    }

    #[tokio::test]
    async fn unknown_ids_fail_everywhere_with_same_id() {
        let svc = svc();
        for err in [
            svc.find_one(77).await.unwrap_err(),
            svc.update(77, UpdateProductInput::default()).await.unwrap_err(),
            svc.remove(77).await.unwrap_err(),
        ] {
            assert_eq!(err.to_string(), "Product with id 77 not found");
        }
    }

    #[tokio::test]
    async fn update_ignores_id_in_patch_and_keeps_unset_fields() {
        let svc = svc();
        svc.create(input("A", 10.0)).await.unwrap();
        svc.create(input("B", 20.0)).await.unwrap();

        let patch = UpdateProductInput { id: Some(2), price: Some(15.0), name: None };
        let updated = svc.update(1, patch).await.unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.price, 15.0);
        assert_eq!(updated.name, "A");

        let other = svc.find_one(2).await.unwrap();
        assert_eq!((other.name.as_str(), other.price), ("B", 20.0));
    }

    #[tokio::test]
    async fn find_all_pages_active_rows_only() {
        let svc = svc();
        for i in 1..=6 {
            svc.create(input(&format!("P{i}"), i as f64)).await.unwrap();
        }
        svc.remove(2).await.unwrap();

        let first = svc.find_all(Pagination::new(1, 2).unwrap()).await.unwrap();
        assert_eq!(first.meta, PageMeta { total: 5, page: 1, last_page: 3 });
        assert_eq!(first.data.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        let last = svc.find_all(Pagination::new(3, 2).unwrap()).await.unwrap();
        assert_eq!(last.data.iter().map(|p| p.id).collect::<Vec<_>>(), vec![6]);

        for page in 1..=4 {
            let res = svc.find_all(Pagination::new(page, 2).unwrap()).await.unwrap();
            assert!(res.data.iter().all(|p| p.available));
        }
    }

    #[tokio::test]
    async fn find_all_first_page_length_is_min_of_total_and_limit() {
        let svc = svc();
        for i in 0..3 {
            svc.create(input(&format!("P{i}"), 1.0)).await.unwrap();
        }
        for limit in 1..=5u64 {
            let res = svc.find_all(Pagination::new(1, limit).unwrap()).await.unwrap();
            assert_eq!(res.data.len() as u64, limit.min(3));
            assert_eq!(res.meta.total, 3);
            assert_eq!(res.meta.last_page, 3u64.div_ceil(limit));
        }
    }

    #[tokio::test]
    async fn empty_catalog_has_zero_pages() {
        let res = svc().find_all(Pagination::default()).await.unwrap();
        assert!(res.data.is_empty());
        assert_eq!(res.meta, PageMeta { total: 0, page: 1, last_page: 0 });
    }
}
