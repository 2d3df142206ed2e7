//! # Handlers Module
//!
//! The six item operations and the [`ItemHandlers`] set that runs them
//! through the middleware chain.
//!
//! | Operation | Method | Path | Success |
//! |---|---|---|---|
//! | [`Operation::Create`] | `POST` | `/items` | `201` + created item |
//! | [`Operation::List`] | `GET` | `/items` | `200` + array of items |
//! | [`Operation::Get`] | `GET` | `/items/{id}` | `200` + item |
//! | [`Operation::Update`] | `PUT` | `/items/{id}` | `200` + updated item |
//! | [`Operation::Delete`] | `DELETE` | `/items/{id}` | `204`, empty body |
//! | [`Operation::Preflight`] | `OPTIONS` | any | `200`, empty body |
//!
//! Each operation makes at most one store call. Failures become
//! [`HandlerError`]s and are rendered as `{"error": "..."}`; the middleware
//! chain then decorates every response, success or failure alike.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use item_handlers::handlers::{ItemHandlers, Operation};
//! use item_handlers::store::MemoryStore;
//!
//! let handlers = ItemHandlers::with_defaults(Arc::new(MemoryStore::new()));
//! let response = handlers.call(Operation::List, request).await;
//! ```

mod create;
mod delete;
mod get;
mod list;
mod preflight;
mod update;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use tracing::{debug, error, info_span, Instrument};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::{HandlerError, ID_REQUIRED};
use crate::ids::{IdGenerator, UlidGenerator};
use crate::middleware::{CorsMiddleware, Middleware, TracingMiddleware};
use crate::model::KEY_ATTRIBUTE;
use crate::store::ItemStore;

/// One of the independently deployable item operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
    Preflight,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Create,
        Operation::List,
        Operation::Get,
        Operation::Update,
        Operation::Delete,
        Operation::Preflight,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Preflight => "preflight",
        }
    }

    /// Method the operation is normally routed on.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Operation::Create => Method::POST,
            Operation::List | Operation::Get => Method::GET,
            Operation::Update => Method::PUT,
            Operation::Delete => Method::DELETE,
            Operation::Preflight => Method::OPTIONS,
        }
    }

    /// Whether the operation reads the item id from the path.
    #[must_use]
    pub fn takes_id(self) -> bool {
        matches!(self, Operation::Get | Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised operation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown operation '{}' (expected create, list, get, update, delete or preflight)",
            self.0
        )
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// The item operations bound to one store, id generator and middleware
/// chain.
///
/// Build it once per process (cold start) and share it across invocations.
pub struct ItemHandlers {
    store: Arc<dyn ItemStore>,
    ids: Arc<dyn IdGenerator>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl ItemHandlers {
    /// Handler set without middleware.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            middlewares: Vec::new(),
        }
    }

    /// ULID item ids, wildcard CORS and per-invocation access logging.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn ItemStore>) -> Self {
        let mut handlers = Self::new(store, Arc::new(UlidGenerator));
        handlers.add_middleware(Arc::new(CorsMiddleware::default()));
        handlers.add_middleware(Arc::new(TracingMiddleware));
        handlers
    }

    /// Append a middleware. `before` hooks run in insertion order, as do
    /// `after` hooks.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Run one operation for one request.
    ///
    /// Never fails: every outcome, including store failures, is a response
    /// carrying the middleware headers.
    pub async fn call(&self, operation: Operation, req: HandlerRequest) -> HandlerResponse {
        let span = info_span!(
            "item_operation",
            request_id = %req.request_id,
            operation = %operation,
        );
        async move {
            let mut early_response = None;
            for middleware in &self.middlewares {
                if let Some(resp) = middleware.before(&req) {
                    early_response.get_or_insert(resp);
                }
            }

            let start = Instant::now();
            let mut resp = match early_response {
                Some(resp) => resp,
                None => match self.dispatch(operation, &req).await {
                    Ok(resp) => resp,
                    Err(err) => {
                        match &err {
                            HandlerError::Store(cause) => {
                                error!(error = %cause, "store call failed");
                            }
                            other => debug!(error = %other, "request rejected"),
                        }
                        err.to_response()
                    }
                },
            };
            let latency = start.elapsed();

            for middleware in &self.middlewares {
                middleware.after(&req, &mut resp, latency);
            }
            resp
        }
        .instrument(span)
        .await
    }

    async fn dispatch(
        &self,
        operation: Operation,
        req: &HandlerRequest,
    ) -> Result<HandlerResponse, HandlerError> {
        let store = self.store.as_ref();
        match operation {
            Operation::Create => create::handle(store, self.ids.as_ref(), req).await,
            Operation::List => list::handle(store).await,
            Operation::Get => get::handle(store, req).await,
            Operation::Update => update::handle(store, req).await,
            Operation::Delete => delete::handle(store, req).await,
            Operation::Preflight => Ok(preflight::handle()),
        }
    }

    pub async fn create(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::Create, req).await
    }

    pub async fn list(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::List, req).await
    }

    pub async fn get(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::Get, req).await
    }

    pub async fn update(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::Update, req).await
    }

    pub async fn delete(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::Delete, req).await
    }

    pub async fn preflight(&self, req: HandlerRequest) -> HandlerResponse {
        self.call(Operation::Preflight, req).await
    }
}

impl fmt::Debug for ItemHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandlers")
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

/// The non-empty `id` path parameter.
fn path_id(req: &HandlerRequest) -> Result<&str, HandlerError> {
    req.get_path_param(KEY_ATTRIBUTE)
        .filter(|id| !id.is_empty())
        .ok_or(HandlerError::Validation(ID_REQUIRED))
}
