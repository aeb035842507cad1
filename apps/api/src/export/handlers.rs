//! Axum route handler for the PDF export.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::export::export_pdf;
use crate::layout::{ExportStrategy, PageSize};
use crate::state::AppState;

/// Multipart field carrying the rendered preview (PNG or JPEG).
pub const PREVIEW_FIELD: &str = "preview";

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub strategy: Option<ExportStrategy>,
}

/// POST /api/v1/export/pdf
///
/// Accepts the rasterised preview and returns an A4 PDF. Only one export runs
/// at a time; a concurrent request gets 409 and must be retried by the user.
/// The slot is held by the blocking job, not by this future.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(ticket) = state.export_guard.try_acquire() else {
        warn!("Export rejected: another export is still in progress");
        return Err(AppError::Conflict(
            "Uma exportação já está em andamento".to_string(),
        ));
    };

    let strategy = query.strategy.unwrap_or(state.config.export_strategy);
    let token = ticket.token();
    info!("Export {token} started (strategy: {strategy})");

    let image = read_preview(multipart).await?;

    let max_pages = state.config.max_export_pages;
    let pdf = ticket
        .run_blocking(move || export_pdf(&image, strategy, PageSize::A4, max_pages))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))?
        .map_err(|e| {
            error!("Export {token} failed: {e}");
            AppError::from(e)
        })?;

    info!("Export {token} finished ({} bytes)", pdf.len());

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.export_file_name
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

async fn read_preview(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() == Some(PREVIEW_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            if bytes.is_empty() {
                return Err(AppError::Validation("preview image is empty".to_string()));
            }
            return Ok(bytes);
        }
    }

    Err(AppError::Validation(format!(
        "multipart field '{PREVIEW_FIELD}' is required"
    )))
}
