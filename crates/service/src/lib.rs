//! Service layer for the product catalog.
//! - Business rules (active-only visibility, soft delete) live here.
//! - Persistence sits behind the `ProductStore` trait with SeaORM and in-memory implementations.

pub mod pagination;
pub mod products;
#[cfg(test)]
pub mod test_support;
