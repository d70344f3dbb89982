//! API error types
//!
//! One flat, tagged taxonomy instead of an exception tree: every domain
//! error maps to exactly one of these kinds, and every kind maps to
//! exactly one transport status, both in single `match` expressions here.

use miette::Diagnostic;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tether_core::CoreError;
use tether_core::id::IdError;

/// API error response
#[derive(Debug, thiserror::Error, Diagnostic, Serialize, Deserialize)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation failed: {message}")]
    #[diagnostic(
        code(api::validation_error),
        help("Check the field errors for specific validation issues")
    )]
    Validation {
        message: String,
        fields: Option<Vec<FieldError>>,
    },

    /// Authentication required
    #[error("Authentication required")]
    #[diagnostic(
        code(api::unauthorized),
        help("Please provide valid authentication credentials")
    )]
    Unauthorized { message: Option<String> },

    /// Authenticated but not allowed
    #[error("Forbidden: {message}")]
    #[diagnostic(code(api::forbidden), help("This action is not available to you"))]
    Forbidden { message: String },

    /// Resource not found
    #[error("Resource not found: {resource_type}")]
    #[diagnostic(
        code(api::not_found),
        help("The {resource_type} with ID '{resource_id}' does not exist")
    )]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Conflict with existing resource
    #[error("Resource conflict")]
    #[diagnostic(
        code(api::conflict),
        help("The resource already exists or is in a conflicting state")
    )]
    Conflict { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    #[diagnostic(
        code(api::rate_limited),
        help("Please wait {retry_after_seconds} seconds before retrying")
    )]
    RateLimited { retry_after_seconds: u64 },

    /// Service temporarily unavailable
    #[error("Service temporarily unavailable")]
    #[diagnostic(
        code(api::service_unavailable),
        help("The service is temporarily down for maintenance")
    )]
    ServiceUnavailable { retry_after_seconds: Option<u64> },

    /// Something went wrong on our side
    #[error("Internal error")]
    #[diagnostic(code(api::internal), help("Not the caller's fault; try again later"))]
    Internal { message: String },
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ApiError {
    /// Get HTTP status code for this error.
    ///
    /// The only place in the codebase where error kinds meet transport
    /// statuses.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::Forbidden { .. } => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::RateLimited { .. } => 429,
            ApiError::ServiceUnavailable { .. } => 503,
            ApiError::Internal { .. } => 500,
        }
    }

    /// Create a validation error without field details
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: None,
        }
    }

    /// Create a validation error pinned to a single field
    pub fn validation_field(
        message: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Some(vec![FieldError {
                field: field.into(),
                message: detail.into(),
            }]),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

// Conversion implementations

impl From<CoreError> for ApiError {
    /// Each domain error kind lands on exactly one API kind; adding a
    /// `CoreError` variant forces a decision here rather than defaulting
    /// to a 500
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::SelfConnection { .. } => {
                Self::validation_field(message, "to", "must differ from the requesting user")
            }
            CoreError::AlreadyConnected { .. } => Self::Conflict { message },
            CoreError::ConnectionNotFound { a, b } => {
                Self::not_found("connection", format!("{a} <-> {b}"))
            }
            CoreError::InvalidTransition { .. } => Self::Conflict { message },
            CoreError::InvalidUsername { reason, .. } => {
                Self::validation_field(message, "username", reason)
            }
            CoreError::MessageTooLong { max, .. } => {
                Self::validation_field(message, "body", format!("at most {max} characters"))
            }
            CoreError::UnknownReactionKind { name } => {
                Self::validation_field(message, "kind", format!("'{name}' is not a reaction"))
            }
            CoreError::OtpExpired => Self::validation(message),
            CoreError::OtpMismatch { .. } => Self::validation(message),
            CoreError::OtpAttemptsExhausted => Self::Forbidden { message },
            CoreError::ResendThrottled {
                retry_after_seconds,
            } => Self::RateLimited {
                retry_after_seconds,
            },
            CoreError::ConfigIo { .. }
            | CoreError::ConfigParse { .. }
            | CoreError::ConfigEncode { .. } => Self::Internal { message },
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::validation_field("Malformed identifier", "id", err.to_string())
    }
}

impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        Self::validation_field("Malformed identifier", "id", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use tether_core::UserId;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(ApiError::validation("bad").status_code(), 400);
        assert_eq!(ApiError::Unauthorized { message: None }.status_code(), 401);
        assert_eq!(
            ApiError::Forbidden {
                message: "locked".into()
            }
            .status_code(),
            403
        );
        assert_eq!(ApiError::not_found("story", "story_x").status_code(), 404);
        assert_eq!(
            ApiError::Conflict {
                message: "exists".into()
            }
            .status_code(),
            409
        );
        assert_eq!(
            ApiError::RateLimited {
                retry_after_seconds: 30
            }
            .status_code(),
            429
        );
        assert_eq!(
            ApiError::ServiceUnavailable {
                retry_after_seconds: None
            }
            .status_code(),
            503
        );
        assert_eq!(
            ApiError::Internal {
                message: "oops".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_core_errors_map_to_single_kinds() {
        let user = UserId::generate();

        let err: ApiError = CoreError::self_connection(user).into();
        assert_eq!(err.status_code(), 400);
        assert!(matches!(err, ApiError::Validation { .. }));

        let err: ApiError = CoreError::AlreadyConnected {
            id: "conn_x".into(),
        }
        .into();
        assert_eq!(err.status_code(), 409);

        let err: ApiError = CoreError::ConnectionNotFound {
            a: "user_a".into(),
            b: "user_b".into(),
        }
        .into();
        assert!(
            matches!(&err, ApiError::NotFound { resource_type, .. } if resource_type == "connection")
        );
        assert_eq!(err.status_code(), 404);

        let err: ApiError = CoreError::OtpAttemptsExhausted.into();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_throttle_carries_retry_after() {
        let err: ApiError = CoreError::ResendThrottled {
            retry_after_seconds: 42,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::RateLimited {
                retry_after_seconds: 42
            }
        ));
    }

    #[test]
    fn test_validation_mappings_name_the_field() {
        let err: ApiError =
            CoreError::invalid_username("Bad Name", "contains disallowed character ' '").into();
        let ApiError::Validation {
            fields: Some(fields),
            ..
        } = err
        else {
            panic!("expected field-level validation error");
        };
        assert_eq!(fields[0].field, "username");

        let err: ApiError = CoreError::MessageTooLong {
            len: 5000,
            max: 4096,
        }
        .into();
        let ApiError::Validation {
            fields: Some(fields),
            ..
        } = err
        else {
            panic!("expected field-level validation error");
        };
        assert_eq!(fields[0].field, "body");
    }

    #[test]
    fn test_malformed_ids_are_validation_errors() {
        let err = UserId::from_str("story_0be433f3-fb10-4d6b-8ca1-7ac3f29ee5d0").unwrap_err();
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), 400);

        let api: ApiError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert_eq!(api.status_code(), 400);
    }

    #[test]
    fn test_config_failures_stay_internal() {
        let api: ApiError = CoreError::ConfigIo {
            path: "/etc/tether.toml".into(),
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert_eq!(api.status_code(), 500);
    }

    #[test]
    fn test_wire_form_is_tagged() {
        let err = ApiError::not_found("story", "story_abc");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("NotFound"));
        assert!(json.contains("story_abc"));

        let back: ApiError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status_code(), 404);
    }
}
