// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{
    error::{BlockingError, ResponseError},
    http::StatusCode,
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;

/// User-facing message for a model reply that could not be parsed
pub const FORMAT_ERROR_MESSAGE: &str = "搜尋結果格式錯誤，無法解析。";

/// User-facing message for any other failure of the model call
pub const SERVICE_ERROR_MESSAGE: &str = "呼叫 AI 服務時發生錯誤，請稍後再試。";

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum PlacesError {
    /// Model reply contained a bracketed span that is not valid JSON
    #[error("{}", FORMAT_ERROR_MESSAGE)]
    MalformedResponse(String),

    /// Transport, status or envelope failure talking to the model
    #[error("{}", SERVICE_ERROR_MESSAGE)]
    AiServiceError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl PlacesError {
    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            PlacesError::MalformedResponse(_) => "FORMAT_ERROR",
            PlacesError::AiServiceError(_) => "AI_SERVICE_ERROR",
            PlacesError::InvalidInput(_) => "INVALID_INPUT",
            PlacesError::ValidationError(_) => "VALIDATION_ERROR",
            PlacesError::StorageError(_) => "STORAGE_ERROR",
            PlacesError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

/// Storage work runs on the blocking pool; losing it is a storage failure
impl From<BlockingError> for PlacesError {
    fn from(e: BlockingError) -> Self {
        log::error!("Blocking storage task failed: {}", e);
        PlacesError::StorageError(e.to_string())
    }
}

/// Convert PlacesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PlacesError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            PlacesError::AiServiceError(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlacesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlacesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PlacesError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_errors_have_distinct_messages() {
        let format = PlacesError::MalformedResponse("bad json".to_string());
        let service = PlacesError::AiServiceError("timeout".to_string());

        assert_eq!(format.to_string(), FORMAT_ERROR_MESSAGE);
        assert_eq!(service.to_string(), SERVICE_ERROR_MESSAGE);
        assert_ne!(format.status_code(), service.status_code());
        assert_ne!(format.code(), service.code());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PlacesError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            PlacesError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
