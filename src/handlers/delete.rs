//! `DELETE /items/{id}`

use super::path_id;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::HandlerError;
use crate::store::ItemStore;

/// Unconditional delete: `204` whether or not the item existed.
pub(super) async fn handle(
    store: &dyn ItemStore,
    req: &HandlerRequest,
) -> Result<HandlerResponse, HandlerError> {
    let id = path_id(req)?;
    store.delete(id).await?;
    Ok(HandlerResponse::empty(204))
}
