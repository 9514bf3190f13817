use serde::{Deserialize, Serialize};
use service::products::ProductError;
use thiserror::Error;
use tracing::error;

/// Error body sent back to RPC callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub status: u16,
    pub message: String,
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const NO_HANDLER_MESSAGE: &str = "There is no matching message handler defined in the remote service.";

impl RpcError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(400, message) }

    pub fn no_handler() -> Self { Self::new(404, NO_HANDLER_MESSAGE) }

    pub fn internal() -> Self { Self::new(500, INTERNAL_ERROR_MESSAGE) }

    pub fn is_client_error(&self) -> bool { (400..500).contains(&self.status) }
}

impl From<ProductError> for RpcError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::Store(ref msg) => {
                // Store failures are not translated; only logged.
                error!(error = %msg, "store failure");
                RpcError::internal()
            }
            other => RpcError::new(other.status(), other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("message bus connection failed: {0}")]
    Transport(String),
}
