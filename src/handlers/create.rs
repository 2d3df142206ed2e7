//! `POST /items`

use serde_json::Value;
use tracing::debug;

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::{HandlerError, NAME_REQUIRED};
use crate::ids::IdGenerator;
use crate::model::Item;
use crate::store::ItemStore;

/// Validate `name`, assign a fresh id (replacing any supplied one) and put
/// the item.
pub(super) async fn handle(
    store: &dyn ItemStore,
    ids: &dyn IdGenerator,
    req: &HandlerRequest,
) -> Result<HandlerResponse, HandlerError> {
    let mut item = Item::from(req.json_body()?);
    if item.name().is_none() {
        return Err(HandlerError::Validation(NAME_REQUIRED));
    }

    if let Some(supplied) = item.id() {
        debug!(supplied_id = %supplied, "replacing caller-supplied id");
    }
    item.assign_id(ids.next_id());
    store.put(&item).await?;

    debug!(id = item.id().unwrap_or_default(), fields = item.len(), "item created");
    Ok(HandlerResponse::json(201, Value::from(item)))
}
