use thiserror::Error;

/// Errors surfaced by the product catalog.
///
/// `NotFound` and `Validation` are client errors; `Store` carries whatever
/// the data layer reported, unmodified.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    #[error("Product with id {id} not found")]
    NotFound { id: i32 },
    #[error("{0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
}

impl ProductError {
    pub fn not_found(id: i32) -> Self { Self::NotFound { id } }

    /// HTTP-style status used in RPC error replies.
    pub fn status(&self) -> u16 {
        match self {
            ProductError::NotFound { .. } => 404,
            ProductError::Validation(_) => 400,
            ProductError::Store(_) => 500,
        }
    }
}

impl From<models::errors::ModelError> for ProductError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ProductError::Validation(msg),
            models::errors::ModelError::Db(msg) => ProductError::Store(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(e: sea_orm::DbErr) -> Self { ProductError::Store(e.to_string()) }
}
