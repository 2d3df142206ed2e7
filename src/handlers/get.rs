//! `GET /items/{id}`

use serde_json::Value;

use super::path_id;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::{HandlerError, NOT_FOUND};
use crate::store::ItemStore;

pub(super) async fn handle(
    store: &dyn ItemStore,
    req: &HandlerRequest,
) -> Result<HandlerResponse, HandlerError> {
    let id = path_id(req)?;
    match store.get(id).await? {
        Some(item) => Ok(HandlerResponse::json(200, Value::from(item))),
        None => Err(HandlerError::NotFound(NOT_FOUND)),
    }
}
