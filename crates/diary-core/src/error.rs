//! Error types for diary-core
//!
//! Every failure of the domain layer is a `CoreError`. Each variant maps to
//! a stable `ErrorCode` and an `ErrorSeverity`, and can be expanded into
//! `ErrorDetails` for logs and JSON responses.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Entity not found
    NotFound,
    /// A field failed validation
    ValidationError,
    /// Request is well-formed but refers to something that cannot be processed
    Unprocessable,
    /// Persisted data violates a domain invariant
    DataIntegrity,
    /// Snapshot read/write failure
    StorageError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::Unprocessable => write!(f, "UNPROCESSABLE"),
            ErrorCode::DataIntegrity => write!(f, "DATA_INTEGRITY"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for logs and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Client-side problem, the request can be corrected
    Warning,
    Error,
    /// Stored data is inconsistent
    Critical,
}

impl ErrorSeverity {
    /// Level a failure of this severity is logged at
    pub fn log_level(self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for diary-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: u64 },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unprocessable entity: {message}")]
    Unprocessable { message: String },

    #[error("Data integrity violation: {message}")]
    DataIntegrity { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    pub fn not_found(entity: &str, id: u64) -> Self {
        CoreError::NotFound {
            entity: entity.to_string(),
            id,
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        CoreError::Unprocessable {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::Unprocessable { .. } => ErrorCode::Unprocessable,
            CoreError::DataIntegrity { .. } => ErrorCode::DataIntegrity,
            CoreError::Storage { .. } => ErrorCode::StorageError,
            CoreError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::Validation { .. } => ErrorSeverity::Warning,
            CoreError::Unprocessable { .. } => ErrorSeverity::Warning,
            CoreError::DataIntegrity { .. } => ErrorSeverity::Critical,
            CoreError::Storage { .. } => ErrorSeverity::Error,
            CoreError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller can fix the request (answered with 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound { .. } | CoreError::Validation { .. } | CoreError::Unprocessable { .. }
        )
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotFound { entity, id } => details
                .with_detail(serde_json::json!({ "entity": entity, "id": id }))
                .with_suggestion("Check that the identifier belongs to the current user.".to_string()),
            CoreError::Validation { field, message } => details
                .with_detail(serde_json::json!({ "field": field, "validation_message": message }))
                .with_suggestion("Correct the highlighted field and submit again.".to_string()),
            CoreError::Unprocessable { .. } => details
                .with_suggestion("Reload the page, the entry may have been removed.".to_string()),
            CoreError::DataIntegrity { .. } => details
                .with_suggestion("Inspect the snapshot file for entries with an unknown item type.".to_string()),
            CoreError::Storage { .. } => details
                .with_suggestion("Check that the data directory exists and is writable.".to_string()),
            CoreError::Internal { .. } => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::Storage {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Storage {
            message: format!("snapshot encoding: {}", error),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub user_id: Option<u64>,
    /// Operation being performed
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            user_id: None,
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let severity = error.severity();
        log::log!(
            target: "diary::error",
            severity.log_level(),
            "{} {} - Operation: {} - User: {:?} - Data: {}",
            severity.to_string().to_uppercase(),
            error.to_details(),
            context.operation,
            context.user_id,
            context.data
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCode::DataIntegrity.to_string(), "DATA_INTEGRITY");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::DataIntegrity { message: "item type 4".to_string() };
        assert_eq!(error.code(), ErrorCode::DataIntegrity);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_client_error());

        let error = CoreError::validation("item_cost", "must not be negative");
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert!(error.is_client_error());
    }

    #[test]
    fn test_error_details_validation() {
        let details = CoreError::validation("product_title", "too short").to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert_eq!(details.details.as_ref().unwrap()["field"], "product_title");
        assert_eq!(details.suggestions.len(), 1);
        assert!(details.message.contains("product_title"));
    }

    #[test]
    fn test_severity_log_level() {
        let storage = CoreError::Storage { message: "disk full".to_string() };
        assert_eq!(storage.severity().log_level(), log::Level::Error);
        assert_eq!(CoreError::not_found("item", 1).severity().log_level(), log::Level::Info);
        assert_eq!(
            CoreError::unprocessable("gone").severity().log_level(),
            log::Level::Warn
        );
    }

    #[test]
    fn test_storage_details_suggest_checking_data_dir() {
        let details = CoreError::Storage { message: "denied".to_string() }.to_details();
        assert_eq!(details.code, ErrorCode::StorageError);
        assert!(details.details.is_none());
        assert!(details.to_string().contains("Suggestions:"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let error: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(error.code(), ErrorCode::StorageError);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("delete_item")
            .with_user_id(1)
            .with_data("item_id", serde_json::json!(42));

        assert_eq!(context.operation, "delete_item");
        assert_eq!(context.user_id, Some(1));
        assert_eq!(context.data["item_id"], 42);
    }
}
