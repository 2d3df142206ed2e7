//! # Dispatcher Module
//!
//! Request and response descriptors for the item operations.
//!
//! The hosting layer (see [`crate::lambda`]) decides which operation an
//! inbound request belongs to and converts it into a [`HandlerRequest`]. The
//! operation returns a [`HandlerResponse`], which the middleware chain
//! decorates before the adapter turns it back into the platform's response.
//!
//! ## Request Flow
//!
//! 1. Adapter builds a `HandlerRequest` (raw body, path params, headers)
//! 2. Middleware `before` hooks run; one may answer early
//! 3. The operation performs its single store call
//! 4. Failures are mapped to status + `{"error": ...}` bodies
//! 5. Middleware `after` hooks decorate the response (CORS headers)

mod core;

pub use self::core::{
    HandlerRequest, HandlerResponse, HeaderVec, ParamVec, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS,
};
