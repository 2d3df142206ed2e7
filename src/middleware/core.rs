use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hook run around every item operation.
///
/// `before` may answer the request itself; the operation is then skipped but
/// every middleware's `after` still runs on the early response.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
