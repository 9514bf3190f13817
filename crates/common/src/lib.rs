//! Shared runtime plumbing for the products workspace: logging setup and
//! the admin HTTP endpoint.

pub mod utils;
pub mod admin_http;
