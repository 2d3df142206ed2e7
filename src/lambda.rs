//! AWS Lambda hosting for a single item operation.
//!
//! Each deployed function runs one [`Operation`]; API Gateway routes the
//! method and path to it and supplies the `{id}` path parameter.

use std::sync::Arc;

use lambda_http::{service_fn, Body, Error, Request, RequestExt, Response};
use tracing::info;

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::handlers::{ItemHandlers, Operation};
use crate::ids::RequestId;
use crate::model::KEY_ATTRIBUTE;

/// Header carrying a caller-supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Convert an API Gateway event into a [`HandlerRequest`].
///
/// The body bytes are passed through untouched, text or binary; decoding
/// (and rejecting non-UTF-8 content) is left to the operation. A missing or
/// zero-length body is absent.
#[must_use]
pub fn to_handler_request(event: Request) -> HandlerRequest {
    let path_params = event.path_parameters();
    let mut req = HandlerRequest::new(event.method().clone(), event.uri().path());
    if let Some(id) = path_params.first(KEY_ATTRIBUTE) {
        req = req.with_path_param(KEY_ATTRIBUTE, id);
    }
    for (name, value) in event.headers() {
        if let Ok(value) = value.to_str() {
            req = req.with_header(name.as_str(), value);
        }
    }
    req.request_id = RequestId::from_header_or_new(req.get_header(REQUEST_ID_HEADER));

    req.body = match event.into_body() {
        Body::Empty => None,
        Body::Text(text) if text.is_empty() => None,
        Body::Text(text) => Some(text.into_bytes()),
        Body::Binary(bytes) if bytes.is_empty() => None,
        Body::Binary(bytes) => Some(bytes),
    };
    req
}

/// Convert a decorated [`HandlerResponse`] into the Lambda response.
pub fn to_lambda_response(resp: &HandlerResponse) -> Result<Response<Body>, http::Error> {
    let mut builder = Response::builder().status(resp.status);
    for (name, value) in &resp.headers {
        builder = builder.header(name.as_ref(), value.as_str());
    }
    builder.body(Body::from(resp.body_text()))
}

/// Serve `operation` on the Lambda runtime until it shuts down.
pub async fn run(handlers: Arc<ItemHandlers>, operation: Operation) -> Result<(), Error> {
    info!(operation = %operation, "starting lambda runtime");
    lambda_http::run(service_fn(move |event: Request| {
        let handlers = Arc::clone(&handlers);
        async move {
            let req = to_handler_request(event);
            let resp = handlers.call(operation, req).await;
            Ok::<_, Error>(to_lambda_response(&resp)?)
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use http::Method;
    use std::collections::HashMap;

    fn event(method: &str, uri: &str, body: Body) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .header("Origin", "https://app.example")
            .body(body)
            .unwrap()
    }

    #[test]
    fn event_fields_are_carried_over() {
        let req = event("PUT", "/items/a1", Body::from(r#"{"name":"B"}"#)).with_path_parameters(
            HashMap::from([("id".to_string(), "a1".to_string())]),
        );
        let req = to_handler_request(req);
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "/items/a1");
        assert_eq!(req.get_path_param("id"), Some("a1"));
        assert_eq!(req.get_header("origin"), Some("https://app.example"));
        assert_eq!(req.body.as_deref(), Some(&br#"{"name":"B"}"#[..]));
    }

    #[test]
    fn empty_event_body_is_absent() {
        let req = to_handler_request(event("GET", "/items", Body::Empty));
        assert!(req.body.is_none());
        assert!(req.get_path_param("id").is_none());
    }

    #[test]
    fn empty_text_body_is_absent() {
        let req = to_handler_request(event("POST", "/items", Body::Text(String::new())));
        assert!(req.body.is_none());
        assert!(req.json_body().unwrap().is_empty());
    }

    #[test]
    fn binary_body_is_not_rewritten() {
        let raw = b"{\"name\":\"\xff\"}".to_vec();
        let req = to_handler_request(event("POST", "/items", Body::Binary(raw.clone())));
        assert_eq!(req.body.as_deref(), Some(&raw[..]));
        assert!(matches!(req.json_body(), Err(StoreError::Codec(_))));
    }

    #[test]
    fn caller_request_id_is_kept() {
        let id = RequestId::new();
        let raw = http::Request::builder()
            .uri("/items")
            .header(REQUEST_ID_HEADER, id.to_string())
            .body(Body::Empty)
            .unwrap();
        assert_eq!(to_handler_request(raw).request_id, id);
    }

    #[test]
    fn empty_response_body_is_empty_text() {
        let mut resp = HandlerResponse::empty(204);
        resp.set_header("access-control-allow-origin", "*".to_string());
        let out = to_lambda_response(&resp).unwrap();
        assert_eq!(out.status(), 204);
        assert_eq!(out.headers()["access-control-allow-origin"], "*");
        assert!(matches!(out.body(), Body::Text(text) if text.is_empty()));
    }
}
