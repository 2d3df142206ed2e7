//! `PUT /items/{id}`

use serde_json::Value;
use tracing::debug;

use super::path_id;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::{HandlerError, ITEM_NOT_FOUND, NO_FIELDS_TO_UPDATE};
use crate::model::KEY_ATTRIBUTE;
use crate::store::{ItemStore, StoreError, UpdateExpressionBuilder};

/// Partial update of an existing item.
///
/// Checks run in order: path id, body, remaining fields. A body `id` is
/// dropped, never written. The write is conditional on the item existing,
/// so an absent id creates nothing.
pub(super) async fn handle(
    store: &dyn ItemStore,
    req: &HandlerRequest,
) -> Result<HandlerResponse, HandlerError> {
    let id = path_id(req)?;
    let fields = req.json_body()?;
    if fields.contains_key(KEY_ATTRIBUTE) {
        debug!("ignoring id in update body");
    }

    let instruction = UpdateExpressionBuilder::new(KEY_ATTRIBUTE)
        .extend(fields)
        .build()
        .ok_or(HandlerError::Validation(NO_FIELDS_TO_UPDATE))?;

    match store.update(id, &instruction).await {
        Ok(item) => {
            debug!(id, fields = instruction.len(), "item updated");
            Ok(HandlerResponse::json(200, Value::from(item)))
        }
        Err(StoreError::ConditionFailed) => Err(HandlerError::NotFound(ITEM_NOT_FOUND)),
        Err(err) => Err(err.into()),
    }
}
