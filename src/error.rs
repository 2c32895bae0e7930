//! Registry error types with HTTP status code mapping.
//!
//! [`RegistryError`] is the caller-visible error of the registry layer.
//! Each variant maps to a numeric code, an HTTP status and a structured
//! JSON body on the admin surface.
//!
//! [`NotifyError`] is what an observer returns when a notification cannot
//! be delivered. It never escapes the operation that triggered the
//! notification; it is logged and, for registration listeners, causes the
//! listener to be pruned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "instance not found: IFoo/default"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure to deliver a notification to one observer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Transport-level failure reaching the observer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The observer's hosting process is gone.
    #[error("dead object")]
    DeadObject,

    /// A weakly-held listener no longer resolves.
    #[error("listener no longer alive")]
    StaleListener,
}

/// Caller-visible registry error.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Interface or instance name is empty or malformed.
    #[error("invalid service identity: {0:?}")]
    InvalidIdentity(String),

    /// No instance with the given name is known.
    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    /// The name is known but nothing has registered an implementation yet.
    #[error("instance not registered: {0}")]
    NotRegistered(String),

    /// The handle passed along with a client callback is not the
    /// currently registered implementation.
    #[error("handle is not the registered implementation of {0}")]
    ServiceMismatch(String),
}

impl RegistryError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidIdentity(_) => 1001,
            Self::InstanceNotFound(_) => 2001,
            Self::NotRegistered(_) => 2002,
            Self::ServiceMismatch(_) => 2003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
            Self::InstanceNotFound(_) | Self::NotRegistered(_) => StatusCode::NOT_FOUND,
            Self::ServiceMismatch(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_line_up() {
        let err = RegistryError::InstanceNotFound("IFoo/default".to_string());
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = RegistryError::ServiceMismatch("IFoo/default".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = RegistryError::InvalidIdentity(String::new());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn every_variant_is_a_client_error() {
        let errors = [
            RegistryError::InvalidIdentity(String::new()),
            RegistryError::InstanceNotFound("IFoo/default".to_string()),
            RegistryError::NotRegistered("IFoo/default".to_string()),
            RegistryError::ServiceMismatch("IFoo/default".to_string()),
        ];
        for err in errors {
            assert!(err.status_code().is_client_error());
            assert!((1000..3000).contains(&err.error_code()));
        }
    }

    #[test]
    fn into_response_sets_status() {
        let response = RegistryError::NotRegistered("IFoo/default".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn notify_error_display() {
        assert_eq!(
            NotifyError::Transport("broken pipe".to_string()).to_string(),
            "transport error: broken pipe"
        );
        assert_eq!(NotifyError::DeadObject.to_string(), "dead object");
    }
}
