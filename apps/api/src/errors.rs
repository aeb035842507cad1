use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::pdf::PdfError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A form failed validation; carries the per-field messages.
    #[error("Invalid form: {} field(s)", fields.len())]
    InvalidForm { fields: BTreeMap<String, String> },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Decode(_) | PdfError::Layout(_) => AppError::Validation(e.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidForm { fields } => {
                let body = Json(json!({
                    "error": {
                        "code": "INVALID_FORM",
                        "message": "Corrija os campos destacados",
                        "fields": fields
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::pagination::PaginationError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::InvalidForm {
                    fields: BTreeMap::new(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Llm("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_pdf_input_errors_are_client_errors() {
        let err = AppError::from(PdfError::Layout(PaginationError::EmptyRaster {
            width_px: 0,
            height_px: 10,
        }));
        assert!(matches!(err, AppError::Validation(_)));

        let err = AppError::from(PdfError::EmptyPlan);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_llm_error_keeps_provider_message() {
        let err = AppError::from(LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        });
        match err {
            AppError::Llm(msg) => assert_eq!(msg, "Falha OpenAI: 429 - rate limited"),
            other => panic!("expected Llm, got {other:?}"),
        }
    }
}
