//! `OPTIONS` on any item path.

use crate::dispatcher::HandlerResponse;

/// Bare `200`; the CORS middleware supplies the headers.
pub(super) fn handle() -> HandlerResponse {
    HandlerResponse::empty(200)
}
