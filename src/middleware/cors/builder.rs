use http::Method;
use url::Url;

use super::{CorsConfigError, CorsMiddleware, OriginValidation};

/// Builder for creating `CorsMiddleware` with a fluent API
///
/// # Example
///
/// ```rust
/// use item_handlers::middleware::CorsMiddlewareBuilder;
/// use http::Method;
///
/// let cors = CorsMiddlewareBuilder::new()
///     .allowed_origins(&["https://app.example.com"])
///     .allowed_methods(&[Method::GET, Method::POST])
///     .allow_credentials(true)
///     .max_age(600)
///     .build()
///     .expect("valid CORS configuration");
/// ```
pub struct CorsMiddlewareBuilder {
    allowed_origins: Vec<String>,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
    allow_credentials: bool,
    max_age: Option<u32>,
}

impl CorsMiddlewareBuilder {
    /// Create a builder preloaded with the handler set's defaults
    ///
    /// Default configuration:
    /// - Any origin (`*`)
    /// - Headers: `Content-Type, X-Amz-Date, Authorization, X-Api-Key, X-Amz-Security-Token`
    /// - Methods: `GET, POST, PUT, DELETE, OPTIONS`
    /// - Credentials: `false`
    /// - Max age: `None` (no preflight caching)
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_headers: super::DEFAULT_ALLOWED_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            allowed_methods: super::default_methods(),
            allow_credentials: false,
            max_age: None,
        }
    }

    /// Set allowed origins. `&["*"]` allows every origin.
    #[must_use]
    pub fn allowed_origins(mut self, origins: &[&str]) -> Self {
        self.allowed_origins = origins.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set allowed HTTP methods
    #[must_use]
    pub fn allowed_methods(mut self, methods: &[Method]) -> Self {
        self.allowed_methods = methods.to_vec();
        self
    }

    /// Set allowed request headers
    #[must_use]
    pub fn allowed_headers(mut self, headers: &[&str]) -> Self {
        self.allowed_headers = headers.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Enable or disable `Access-Control-Allow-Credentials: true`.
    /// Cannot be combined with the wildcard origin.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Set preflight cache duration in seconds
    #[must_use]
    pub fn max_age(mut self, seconds: u32) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Build the CORS middleware
    ///
    /// # Errors
    ///
    /// - `WildcardWithCredentials` when credentials meet the `*` origin
    /// - `EmptyOriginsWithCredentials` when credentials have no origin
    /// - `InvalidOriginFormat` for an origin a browser would never send
    pub fn build(self) -> Result<CorsMiddleware, CorsConfigError> {
        let wildcard = self.allowed_origins.iter().any(|o| o == "*");

        if self.allow_credentials {
            if wildcard {
                return Err(CorsConfigError::WildcardWithCredentials);
            }
            if self.allowed_origins.is_empty() {
                return Err(CorsConfigError::EmptyOriginsWithCredentials);
            }
        }

        let origin_validation = if wildcard {
            OriginValidation::Wildcard
        } else {
            if let Some(bad) = self.allowed_origins.iter().find(|o| !is_valid_origin(o)) {
                return Err(CorsConfigError::InvalidOriginFormat {
                    origin: bad.clone(),
                });
            }
            OriginValidation::Exact(self.allowed_origins)
        };

        Ok(CorsMiddleware {
            origin_validation,
            allowed_headers: self.allowed_headers,
            allowed_methods: self.allowed_methods,
            allow_credentials: self.allow_credentials,
            max_age: self.max_age,
        })
    }
}

impl Default for CorsMiddlewareBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// True when `origin` is exactly what a browser would send in `Origin`:
/// the serialized tuple origin of the URL, nothing more.
fn is_valid_origin(origin: &str) -> bool {
    Url::parse(origin)
        .map(|url| url.origin().ascii_serialization() == origin)
        .unwrap_or(false)
}
