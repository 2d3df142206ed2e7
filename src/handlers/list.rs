//! `GET /items`

use serde_json::Value;
use tracing::debug;

use crate::dispatcher::HandlerResponse;
use crate::error::HandlerError;
use crate::store::ItemStore;

pub(super) async fn handle(store: &dyn ItemStore) -> Result<HandlerResponse, HandlerError> {
    let items = store.scan().await?;
    debug!(count = items.len(), "items listed");
    let body = Value::Array(items.into_iter().map(Value::from).collect());
    Ok(HandlerResponse::json(200, body))
}
