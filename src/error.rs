//! Operation failures and their response mapping.

use std::fmt;

use crate::dispatcher::HandlerResponse;
use crate::store::StoreError;

/// `name` missing, empty or not a string on create
pub const NAME_REQUIRED: &str = "name required";
/// Path `id` missing or empty
pub const ID_REQUIRED: &str = "id required in path";
/// Update body empty once `id` is discarded
pub const NO_FIELDS_TO_UPDATE: &str = "no fields to update";
/// Get on an absent id
pub const NOT_FOUND: &str = "not found";
/// Update on an absent id
pub const ITEM_NOT_FOUND: &str = "item not found";
/// Body of every store failure; details stay in the logs
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Why an item operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Caller input failed a precondition. Detected before any store access.
    Validation(&'static str),
    /// The referenced item does not exist.
    NotFound(&'static str),
    /// The store failed, or the request content could not be read.
    Store(StoreError),
}

impl HandlerError {
    /// HTTP status reported for this failure.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Store(_) => 500,
        }
    }

    /// Message placed in the `error` field of the response body.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            HandlerError::Validation(message) | HandlerError::NotFound(message) => message,
            HandlerError::Store(_) => INTERNAL_ERROR,
        }
    }

    /// `{"error": ...}` response for this failure.
    #[must_use]
    pub fn to_response(&self) -> HandlerResponse {
        HandlerResponse::error(self.status(), self.public_message())
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Validation(message) => write!(f, "validation failed: {message}"),
            HandlerError::NotFound(message) => write!(f, "{message}"),
            HandlerError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::Store(err)
    }
}
