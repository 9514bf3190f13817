//! Product catalog: domain types, availability lifecycle, store seam and service.

pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{CreateProductInput, PageMeta, Paginated, Product, UpdateProductInput};
pub use errors::ProductError;
pub use service::ProductsService;
