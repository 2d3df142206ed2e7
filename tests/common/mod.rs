//! Shared fixtures for the handler integration tests.
#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use item_handlers::dispatcher::{HandlerRequest, HandlerResponse};
use item_handlers::middleware::{CorsMiddleware, TracingMiddleware};
use item_handlers::store::{ItemStore, MemoryStore, StoreError, UpdateInstruction};
use item_handlers::{IdGenerator, Item, ItemHandlers};
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

pub const ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Item from a JSON object literal.
pub fn item(value: Value) -> Item {
    serde_json::from_value(value).unwrap()
}

/// Store call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Put(Item),
    Get(String),
    Scan,
    Delete(String),
    Update(String, UpdateInstruction),
}

/// In-memory store that records every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            inner: MemoryStore::with_items(items).unwrap(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub async fn stored(&self, id: &str) -> Option<Item> {
        self.inner.get(id).await.unwrap()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ItemStore for RecordingStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.record(StoreCall::Put(item.clone()));
        self.inner.put(item).await
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        self.record(StoreCall::Get(id.to_string()));
        self.inner.get(id).await
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.record(StoreCall::Scan);
        self.inner.scan().await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(id.to_string()));
        self.inner.delete(id).await
    }

    async fn update(
        &self,
        id: &str,
        instruction: &UpdateInstruction,
    ) -> Result<Item, StoreError> {
        self.record(StoreCall::Update(id.to_string(), instruction.clone()));
        self.inner.update(id, instruction).await
    }
}

/// Store whose every call fails with a backend error.
pub struct FailingStore {
    pub message: &'static str,
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self, operation: &'static str) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::backend(operation, self.message))
    }
}

#[async_trait]
impl ItemStore for FailingStore {
    async fn put(&self, _item: &Item) -> Result<(), StoreError> {
        self.fail("put")
    }

    async fn get(&self, _id: &str) -> Result<Option<Item>, StoreError> {
        self.fail("get")
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.fail("scan")
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        self.fail("delete")
    }

    async fn update(
        &self,
        _id: &str,
        _instruction: &UpdateInstruction,
    ) -> Result<Item, StoreError> {
        self.fail("update")
    }
}

/// Deterministic ids: `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl SequentialIds {
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Handlers over `store` with sequential ids and the default middleware.
pub fn handlers(store: Arc<dyn ItemStore>) -> ItemHandlers {
    handlers_with_ids(store, Arc::new(SequentialIds::default()))
}

pub fn handlers_with_ids(store: Arc<dyn ItemStore>, ids: Arc<dyn IdGenerator>) -> ItemHandlers {
    let mut handlers = ItemHandlers::new(store, ids);
    handlers.add_middleware(Arc::new(CorsMiddleware::default()));
    handlers.add_middleware(Arc::new(TracingMiddleware));
    handlers
}

pub fn request(method: Method, path: &str) -> HandlerRequest {
    HandlerRequest::new(method, path)
}

pub fn request_for(method: Method, id: &str) -> HandlerRequest {
    HandlerRequest::new(method, format!("/items/{id}")).with_path_param("id", id)
}

/// Parsed response body; `Value::Null` for an empty body.
pub fn body(resp: &HandlerResponse) -> Value {
    resp.body.clone().unwrap_or(Value::Null)
}

/// The three wildcard CORS headers are present with their exact values.
pub fn assert_cors(resp: &HandlerResponse) {
    assert_eq!(resp.get_header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        resp.get_header("Access-Control-Allow-Headers"),
        Some(ALLOWED_HEADERS)
    );
    assert_eq!(
        resp.get_header("Access-Control-Allow-Methods"),
        Some(ALLOWED_METHODS)
    );
}

#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture JSON log lines on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(move || writer.clone())
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
    );
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
