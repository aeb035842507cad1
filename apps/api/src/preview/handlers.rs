use axum::{extract::State, Json};

use crate::models::resume::Resume;
use crate::preview::{build_preview, ResumePreview};
use crate::state::AppState;

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Resume> {
    let workspace = state.workspace.read().await;
    Json(workspace.resume.clone())
}

/// GET /api/v1/resume/preview
pub async fn handle_get_preview(State(state): State<AppState>) -> Json<ResumePreview> {
    let workspace = state.workspace.read().await;
    Json(build_preview(
        &workspace.resume,
        workspace.experience_draft.record(),
    ))
}
