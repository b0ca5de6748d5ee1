//! API error types with structured JSON responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use llm_bridge::BridgeError;
use serde::Serialize;

use crate::db::DatabaseError;

/// Structured error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Owner identity required")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Share link expired")]
    LinkExpired,
    #[error("AI service unavailable: {0}")]
    AiUnavailable(String),
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        if err.is_transport() {
            ApiError::AiUnavailable(err.to_string())
        } else {
            ApiError::AnalysisFailed(err.to_string())
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::LinkExpired => StatusCode::GONE,
            ApiError::AiUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::AnalysisFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            ApiError::Unauthorized => ("UNAUTHORIZED", "Unauthorized".to_string()),
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail.clone()),
            ApiError::NotFound(detail) => ("NOT_FOUND", detail.clone()),
            ApiError::LinkExpired => (
                "LINK_EXPIRED",
                "This shared record link has expired. Please ask the pet owner to generate a new link."
                    .to_string(),
            ),
            ApiError::AiUnavailable(detail) => {
                tracing::error!(detail = %detail, "AI backend unavailable");
                (
                    "AI_UNAVAILABLE",
                    "AI service temporarily unavailable. Please try again later.".to_string(),
                )
            }
            ApiError::AnalysisFailed(detail) => {
                tracing::error!(detail = %detail, "Symptom analysis failed");
                (
                    "ANALYSIS_FAILED",
                    "Failed to analyze symptoms. Please try again.".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                ("INTERNAL", "Internal server error".to_string())
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::ValidationError;

    #[test]
    fn bridge_errors_map_to_status() {
        let transport: ApiError = BridgeError::transport("Ollama", "connection refused").into();
        assert_eq!(transport.status(), StatusCode::SERVICE_UNAVAILABLE);

        let invalid: ApiError = BridgeError::Invalid(ValidationError::NoJson).into();
        assert_eq!(invalid.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_link_is_gone() {
        assert_eq!(ApiError::LinkExpired.into_response().status(), StatusCode::GONE);
    }
}
