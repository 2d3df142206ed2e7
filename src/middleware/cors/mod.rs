mod builder;
mod error;

pub use builder::CorsMiddlewareBuilder;
pub use error::CorsConfigError;

use std::time::Duration;

use http::Method;
use tracing::debug;

use crate::config::CorsSettings;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::middleware::Middleware;

/// Request headers a browser client may send, advertised on every response.
pub const DEFAULT_ALLOWED_HEADERS: &[&str] = &[
    "Content-Type",
    "X-Amz-Date",
    "Authorization",
    "X-Api-Key",
    "X-Amz-Security-Token",
];

pub(crate) fn default_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
}

/// Origin validation strategy
#[derive(Debug, Clone)]
pub enum OriginValidation {
    /// Exact string matching
    Exact(Vec<String>),
    /// Wildcard (allow all origins)
    Wildcard,
}

impl OriginValidation {
    fn is_allowed(&self, origin: &str) -> bool {
        match self {
            OriginValidation::Exact(origins) => origins.iter().any(|o| o == origin),
            OriginValidation::Wildcard => true,
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Adds the cross-origin permission headers to every response leaving the
/// handler set, errors included. The preflight operation itself answers
/// `200` with an empty body; this middleware turns it into a complete
/// preflight answer.
///
/// With the default (wildcard) policy the headers are identical on every
/// response:
///
/// ```text
/// access-control-allow-origin: *
/// access-control-allow-headers: Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token
/// access-control-allow-methods: GET,POST,PUT,DELETE,OPTIONS
/// ```
///
/// With an exact origin list the request's `Origin` is echoed back when it
/// is listed (plus `Vary: Origin`); unlisted origins get no allow-origin
/// header and the browser blocks the response.
#[derive(Debug)]
pub struct CorsMiddleware {
    pub(crate) origin_validation: OriginValidation,
    pub(crate) allowed_headers: Vec<String>,
    pub(crate) allowed_methods: Vec<Method>,
    pub(crate) allow_credentials: bool,
    pub(crate) max_age: Option<u32>,
}

impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            origin_validation: OriginValidation::Wildcard,
            allowed_headers: DEFAULT_ALLOWED_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            allowed_methods: default_methods(),
            allow_credentials: false,
            max_age: None,
        }
    }
}

impl CorsMiddleware {
    /// Build the middleware from the `cors` section of the configuration.
    pub fn from_settings(settings: &CorsSettings) -> Result<Self, CorsConfigError> {
        let methods = settings
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
                    CorsConfigError::InvalidMethod {
                        method: m.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let origins: Vec<&str> = settings.allowed_origins.iter().map(String::as_str).collect();
        let headers: Vec<&str> = settings.allowed_headers.iter().map(String::as_str).collect();

        let mut builder = CorsMiddlewareBuilder::new()
            .allowed_origins(&origins)
            .allowed_headers(&headers)
            .allowed_methods(&methods)
            .allow_credentials(settings.allow_credentials);
        if let Some(max_age) = settings.max_age {
            builder = builder.max_age(max_age);
        }
        builder.build()
    }

    /// `Access-Control-Allow-Origin` value for a request, if any.
    fn allow_origin(&self, req: &HandlerRequest) -> Option<String> {
        match &self.origin_validation {
            OriginValidation::Wildcard => Some("*".to_string()),
            validation => {
                let origin = req.get_header("origin")?;
                if validation.is_allowed(origin) {
                    Some(origin.to_string())
                } else {
                    debug!(origin = %origin, "origin not in CORS allow list");
                    None
                }
            }
        }
    }

    fn methods_value(&self) -> String {
        self.allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Middleware for CorsMiddleware {
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        if let Some(origin) = self.allow_origin(req) {
            let echoed = origin != "*";
            res.set_header("access-control-allow-origin", origin);
            if echoed {
                res.set_header("vary", "Origin".to_string());
            }
        }
        res.set_header(
            "access-control-allow-headers",
            self.allowed_headers.join(","),
        );
        res.set_header("access-control-allow-methods", self.methods_value());
        if self.allow_credentials {
            res.set_header("access-control-allow-credentials", "true".to_string());
        }
        if req.method == Method::OPTIONS {
            if let Some(max_age) = self.max_age {
                res.set_header("access-control-max-age", max_age.to_string());
            }
        }
    }
}
