use std::fmt;

/// CORS configuration error
///
/// Returned by `CorsMiddlewareBuilder::build()` and
/// `CorsMiddleware::from_settings()`; reported at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// Wildcard origin (`*`) cannot be used with credentials
    WildcardWithCredentials,
    /// Origin is not the exact serialized origin of a URL
    InvalidOriginFormat {
        /// The invalid origin string
        origin: String,
    },
    /// Credentials enabled without any origin to grant them to
    EmptyOriginsWithCredentials,
    /// Method name is not a valid HTTP method token
    InvalidMethod {
        /// The rejected method string
        method: String,
    },
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::WildcardWithCredentials => write!(
                f,
                "cors.allow_credentials (ITEMS_CORS_ALLOW_CREDENTIALS) needs explicit \
                 cors.allowed_origins, not \"*\""
            ),
            CorsConfigError::InvalidOriginFormat { origin } => write!(
                f,
                "cors.allowed_origins entry '{origin}' is not a browser origin \
                 (expected e.g. https://app.example.com or http://localhost:3000)"
            ),
            CorsConfigError::EmptyOriginsWithCredentials => write!(
                f,
                "cors.allow_credentials is set but cors.allowed_origins \
                 (ITEMS_CORS_ALLOWED_ORIGINS) is empty"
            ),
            CorsConfigError::InvalidMethod { method } => {
                write!(f, "cors.allowed_methods entry '{method}' is not an HTTP method")
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}
