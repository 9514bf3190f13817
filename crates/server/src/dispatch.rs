use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use service::pagination::{Pagination, PaginationInput};
use service::products::repository::ProductStore;
use service::products::{CreateProductInput, ProductsService, UpdateProductInput};

use crate::errors::RpcError;
use crate::observability::{self, Outcome};
use crate::patterns::Pattern;

/// Reply envelope: exactly one of `response` / `err` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<RpcError>,
}

const FALLBACK_REPLY: &[u8] = br#"{"err":{"status":500,"message":"Internal server error"}}"#;

impl RpcReply {
    pub fn ok(value: Value) -> Self { Self { response: Some(value), err: None } }

    pub fn error(err: RpcError) -> Self { Self { response: None, err: Some(err) } }

    pub fn is_ok(&self) -> bool { self.err.is_none() }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| FALLBACK_REPLY.to_vec())
    }

    fn outcome(&self) -> Outcome {
        match &self.err {
            None => Outcome::Ok,
            Some(e) if e.is_client_error() => Outcome::ClientError,
            Some(_) => Outcome::ServerError,
        }
    }
}

/// `{ id }` payload of find-one and delete.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IdPayload {
    id: i32,
}

fn parse<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RpcError> {
    // An empty body is an empty object.
    let body: &[u8] = if payload.iter().all(u8::is_ascii_whitespace) { b"{}" } else { payload };
    serde_json::from_slice(body).map_err(|e| RpcError::bad_request(format!("invalid payload: {e}")))
}

fn positive_id(id: i32) -> Result<i32, RpcError> {
    if id < 1 {
        return Err(RpcError::bad_request("id must be a positive number"));
    }
    Ok(id)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| {
        error!(error = %e, "reply serialization failed");
        RpcError::internal()
    })
}

/// Routes decoded RPC calls to the catalog service. Transport agnostic.
pub struct RpcDispatcher<S: ProductStore> {
    products: ProductsService<S>,
}

impl<S: ProductStore> RpcDispatcher<S> {
    pub fn new(products: ProductsService<S>) -> Self { Self { products } }

    /// Handle one message and build its reply. Never fails; every error
    /// becomes an `err` envelope.
    pub async fn dispatch(&self, subject: &str, payload: &[u8]) -> RpcReply {
        let started = Instant::now();
        let (label, reply) = match subject.parse::<Pattern>() {
            Ok(pattern) => {
                debug!(%pattern, bytes = payload.len(), "rpc_received");
                let reply = match self.route(pattern, payload).await {
                    Ok(value) => RpcReply::ok(value),
                    Err(e) => RpcReply::error(e),
                };
                (pattern.subject(), reply)
            }
            Err(_) => {
                warn!(subject, "no handler for pattern");
                ("unknown", RpcReply::error(RpcError::no_handler()))
            }
        };

        let elapsed = started.elapsed();
        let outcome = reply.outcome();
        observability::record(label, outcome, elapsed);
        match &reply.err {
            None => info!(pattern = label, elapsed_ms = elapsed.as_millis() as u64, "rpc_handled"),
            Some(e) => info!(pattern = label, status = e.status, message = %e.message, "rpc_rejected"),
        }
        reply
    }

    async fn route(&self, pattern: Pattern, payload: &[u8]) -> Result<Value, RpcError> {
        match pattern {
            Pattern::CreateProduct => {
                let input: CreateProductInput = parse(payload)?;
                input.validate()?;
                to_value(self.products.create(input).await?)
            }
            Pattern::FindAllProducts => {
                let input: PaginationInput = parse(payload)?;
                let pagination = Pagination::try_from(input)?;
                to_value(self.products.find_all(pagination).await?)
            }
            Pattern::FindOneProduct => {
                let IdPayload { id } = parse(payload)?;
                to_value(self.products.find_one(positive_id(id)?).await?)
            }
            Pattern::UpdateProduct => {
                let input: UpdateProductInput = parse(payload)?;
                let id = input.id.ok_or_else(|| RpcError::bad_request("id is required"))?;
                let id = positive_id(id)?;
                input.validate()?;
                to_value(self.products.update(id, input).await?)
            }
            Pattern::DeleteProduct => {
                let IdPayload { id } = parse(payload)?;
                to_value(self.products.remove(positive_id(id)?).await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_treats_blank_payload_as_empty_object() {
        let p: PaginationInput = parse(b"  ").unwrap();
        assert_eq!(p, PaginationInput::default());
    }

    #[test]
    fn parse_errors_are_bad_requests() {
        let e = parse::<IdPayload>(b"{not json").unwrap_err();
        assert_eq!(e.status, 400);
    }

    #[test]
    fn reply_envelope_shapes() {
        let ok = RpcReply::ok(json!({"id": 1}));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"response": {"id": 1}}));
        let err = RpcReply::error(RpcError::new(404, "Product with id 1 not found"));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"err": {"status": 404, "message": "Product with id 1 not found"}})
        );
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(positive_id(0).is_err());
        assert!(positive_id(-3).is_err());
        assert_eq!(positive_id(1), Ok(1));
    }
}
