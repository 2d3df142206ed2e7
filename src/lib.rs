//! # item_handlers
//!
//! Stateless request handlers for a single collection of JSON "items",
//! each deployed as its own AWS Lambda function behind API Gateway and
//! backed by one DynamoDB table keyed by `id`.
//!
//! ## Overview
//!
//! Six operations (create, list, get, update, delete and the CORS
//! preflight) translate one HTTP request into at most one store call and
//! map the outcome to a status code and a JSON body. Every response carries
//! the cross-origin headers a browser client needs, errors included.
//!
//! ## Architecture
//!
//! - **[`model`]** - the item record and its two significant attributes
//! - **[`ids`]** - request ids and the item id generator capability
//! - **[`dispatcher`]** - request/response descriptors shared by all layers
//! - **[`store`]** - the [`ItemStore`] capability, the DynamoDB and
//!   in-memory implementations and the update expression builder
//! - **[`error`]** - operation failures and their status/message mapping
//! - **[`handlers`]** - the operations and the [`ItemHandlers`] set
//! - **[`middleware`]** - CORS decoration and access logging
//! - **[`config`]** - YAML + environment settings
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`lambda`]** - the Lambda runtime adapter
//! - **[`cli`]** - the `item-handlers` binary
//!
//! ## Request Flow
//!
//! ```text
//! API Gateway event
//!   -> lambda::to_handler_request
//!   -> middleware before hooks
//!   -> operation (validate, one store call)
//!   -> HandlerError -> {"error": ...}
//!   -> middleware after hooks (CORS headers, access log)
//!   -> lambda::to_lambda_response
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use item_handlers::{HandlerRequest, ItemHandlers, MemoryStore, Operation};
//! use http::Method;
//!
//! let handlers = ItemHandlers::with_defaults(Arc::new(MemoryStore::new()));
//! let req = HandlerRequest::new(Method::POST, "/items").with_body(r#"{"name":"Widget"}"#);
//! let resp = handlers.call(Operation::Create, req).await;
//! assert_eq!(resp.status, 201);
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod lambda;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod store;

pub use config::AppConfig;
pub use dispatcher::{HandlerRequest, HandlerResponse};
pub use error::HandlerError;
pub use handlers::{ItemHandlers, Operation};
pub use ids::{IdGenerator, RequestId, UlidGenerator};
pub use model::Item;
pub use store::{DynamoItemStore, ItemStore, MemoryStore, StoreError};
