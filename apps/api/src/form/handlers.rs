use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::form::errors::{FieldErrors, FormValidation};
use crate::form::experience::{self, ExperienceField, ExperienceUpdate};
use crate::form::personal::{self, PersonalField, PersonalUpdate};
use crate::models::resume::{Experience, ExperienceRecord, PersonalData, Skill, SkillLevel};
use crate::state::AppState;
use crate::workspace::Workspace;

#[derive(Serialize)]
pub struct PersonalFormResponse {
    pub data: PersonalData,
    pub errors: FieldErrors<PersonalField>,
    pub is_valid: bool,
}

#[derive(Serialize)]
pub struct DraftResponse {
    pub draft: ExperienceRecord,
    pub errors: FieldErrors<ExperienceField>,
    pub can_commit: bool,
}

#[derive(Serialize)]
pub struct CommitResponse {
    pub index: usize,
    pub experiences: Vec<Experience>,
    pub draft: DraftResponse,
}

#[derive(Deserialize)]
pub struct AddSkillRequest {
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
}

fn personal_response(workspace: &Workspace) -> PersonalFormResponse {
    let data = workspace.resume.personal.clone();
    PersonalFormResponse {
        is_valid: personal::validate_form(&data).is_valid,
        errors: workspace.personal_form.errors().clone(),
        data,
    }
}

fn draft_response(workspace: &Workspace) -> DraftResponse {
    let draft = &workspace.experience_draft;
    DraftResponse {
        draft: draft.record().clone().into(),
        errors: draft.errors().clone(),
        can_commit: draft.can_commit(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Personal data
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/personal
pub async fn handle_get_personal(State(state): State<AppState>) -> Json<PersonalFormResponse> {
    let mut workspace = state.workspace.write().await;
    workspace.validate_personal();
    Json(personal_response(&workspace))
}

/// PATCH /api/v1/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    Json(update): Json<PersonalUpdate>,
) -> Json<PersonalFormResponse> {
    let mut workspace = state.workspace.write().await;
    workspace.update_personal(update);
    Json(personal_response(&workspace))
}

// ────────────────────────────────────────────────────────────────────────────
// Experience draft
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/experience/draft
pub async fn handle_get_draft(State(state): State<AppState>) -> Json<DraftResponse> {
    let workspace = state.workspace.read().await;
    Json(draft_response(&workspace))
}

/// PATCH /api/v1/experience/draft
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Json(update): Json<ExperienceUpdate>,
) -> Json<DraftResponse> {
    let mut workspace = state.workspace.write().await;
    let field = update.field();
    let errors = workspace.update_draft(update);
    debug!("Draft field {field:?} updated ({} error(s))", errors.len());
    Json(draft_response(&workspace))
}

/// POST /api/v1/experience/draft/commit
pub async fn handle_commit_draft(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CommitResponse>), AppError> {
    let mut workspace = state.workspace.write().await;
    let index = workspace
        .commit_draft()
        .map_err(|errors| AppError::InvalidForm {
            fields: errors.to_name_map(),
        })?;

    info!("Experience committed at index {index}");
    Ok((
        StatusCode::CREATED,
        Json(CommitResponse {
            index,
            experiences: workspace.resume.experiences.clone(),
            draft: draft_response(&workspace),
        }),
    ))
}

/// POST /api/v1/experiences/validate
///
/// Whole-form validation of a record supplied by the client. Unlike the draft,
/// the record may carry both an end date and `current_job`.
pub async fn handle_validate_experience(
    Json(record): Json<ExperienceRecord>,
) -> Json<FormValidation<ExperienceField>> {
    Json(experience::validate_record(&record))
}

/// DELETE /api/v1/experiences/:index
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    let mut workspace = state.workspace.write().await;
    workspace
        .remove_experience(index)
        .ok_or_else(|| AppError::NotFound(format!("Experience {index} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<Vec<Skill>>), AppError> {
    let mut workspace = state.workspace.write().await;
    workspace
        .add_skill(req.name, req.level)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(workspace.resume.skills.clone())))
}

/// DELETE /api/v1/skills/:index
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    let mut workspace = state.workspace.write().await;
    workspace
        .remove_skill(index)
        .ok_or_else(|| AppError::NotFound(format!("Skill {index} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}
