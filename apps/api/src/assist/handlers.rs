use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::form::errors::FieldErrors;
use crate::form::personal::{PersonalField, PersonalUpdate};
use crate::llm_client::KeyCheck;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct KeyCheckRequest {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Serialize)]
pub struct KeyCheckResponse {
    pub status: KeyCheck,
    pub message: &'static str,
    pub ai_active: bool,
}

#[derive(Deserialize)]
pub struct ImproveSummaryRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub summary: String,
    /// Store the improved text into the personal data.
    #[serde(default)]
    pub apply: bool,
}

#[derive(Serialize)]
pub struct ImproveSummaryResponse {
    pub summary: String,
    pub applied: bool,
    /// Personal-form errors after applying; absent when `apply` was false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors<PersonalField>>,
}

/// POST /api/v1/assist/key
pub async fn handle_check_key(
    State(state): State<AppState>,
    Json(req): Json<KeyCheckRequest>,
) -> Json<KeyCheckResponse> {
    let status = state.completion.check_key(&req.api_key).await;
    info!("API key check: {status:?}");
    Json(KeyCheckResponse {
        status,
        message: status.message(),
        ai_active: status.is_active(),
    })
}

/// POST /api/v1/assist/summary
pub async fn handle_improve_summary(
    State(state): State<AppState>,
    Json(req): Json<ImproveSummaryRequest>,
) -> Result<Json<ImproveSummaryResponse>, AppError> {
    if req.api_key.trim().is_empty() {
        return Err(AppError::Validation(
            KeyCheck::Missing.message().to_string(),
        ));
    }
    if req.summary.trim().is_empty() {
        return Err(AppError::Validation(
            "Escreva um resumo antes de pedir melhorias".to_string(),
        ));
    }

    let improved = state
        .completion
        .improve_summary(&req.api_key, &req.summary)
        .await?;

    let errors = if req.apply {
        let mut workspace = state.workspace.write().await;
        let errors = workspace.update_personal(PersonalUpdate {
            field: PersonalField::Summary,
            value: improved.clone(),
        });
        Some(errors.clone())
    } else {
        None
    };

    Ok(Json(ImproveSummaryResponse {
        summary: improved,
        applied: req.apply,
        errors,
    }))
}
