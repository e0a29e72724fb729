//! Error types for diary-api

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use diary_core::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use diary_utils::escape_html;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Malformed or invalid form input
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    Unprocessable { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
        }
    }

    /// Map a domain error, logging server-side failures with their context
    pub fn from_core(error: CoreError, context: ErrorContext) -> Self {
        if !error.is_client_error() {
            DefaultErrorLogger.log_error(&error, &context);
            return ApiError::InternalError;
        }
        match error {
            CoreError::Validation { .. } => ApiError::InvalidInput {
                message: error.to_string(),
            },
            _ => ApiError::Unprocessable {
                message: error.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } | ApiError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        ApiError::from_core(error, ErrorContext::new("request"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = format!(
            "<div class='error text-red-600 text-sm'>{}</div>",
            escape_html(&self.to_string())
        );
        (self.status(), Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::validation("item_cost", "must be a non-negative number").into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::not_found("product", 3).into();
        assert!(matches!(err, ApiError::Unprocessable { .. }));

        let err: ApiError = CoreError::DataIntegrity { message: "unknown item type 4".to_string() }.into();
        assert!(matches!(err, ApiError::InternalError));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err: ApiError = CoreError::Storage { message: "/secret/path denied".to_string() }.into();
        assert_eq!(err.to_string(), "Internal server error");
    }
}
