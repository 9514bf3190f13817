//! RPC surface of the products microservice.
//!
//! `dispatch` turns a (pattern, JSON payload) pair into a reply envelope;
//! `transport` binds it to NATS request/reply subjects.

pub mod patterns;
pub mod errors;
pub mod dispatch;
pub mod observability;
pub mod transport;
pub mod startup;

pub use dispatch::{RpcDispatcher, RpcReply};
pub use startup::run;
