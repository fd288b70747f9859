pub mod auth;

pub use auth::{request_context, require_token};
