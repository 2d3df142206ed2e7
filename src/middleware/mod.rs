//! # Middleware Module
//!
//! Hooks run by [`ItemHandlers`](crate::handlers::ItemHandlers) around every
//! operation, in registration order.
//!
//! - [`CorsMiddleware`] - cross-origin permission headers on every response
//! - [`TracingMiddleware`] - one structured log line per invocation

mod core;
mod cors;
mod tracing;

pub use self::core::Middleware;
pub use cors::{
    CorsConfigError, CorsMiddleware, CorsMiddlewareBuilder, OriginValidation,
    DEFAULT_ALLOWED_HEADERS,
};
pub use self::tracing::TracingMiddleware;
