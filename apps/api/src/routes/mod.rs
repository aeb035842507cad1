pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::export::handlers as export;
use crate::form::handlers as form;
use crate::preview::handlers as preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé and preview
        .route("/api/v1/resume", get(preview::handle_get_resume))
        .route("/api/v1/resume/preview", get(preview::handle_get_preview))
        // Forms
        .route(
            "/api/v1/personal",
            get(form::handle_get_personal).patch(form::handle_update_personal),
        )
        .route(
            "/api/v1/experience/draft",
            get(form::handle_get_draft).patch(form::handle_update_draft),
        )
        .route(
            "/api/v1/experience/draft/commit",
            post(form::handle_commit_draft),
        )
        .route(
            "/api/v1/experiences/validate",
            post(form::handle_validate_experience),
        )
        .route(
            "/api/v1/experiences/:index",
            delete(form::handle_delete_experience),
        )
        .route("/api/v1/skills", post(form::handle_add_skill))
        .route("/api/v1/skills/:index", delete(form::handle_delete_skill))
        // Export
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        // AI assistance
        .route("/api/v1/assist/key", post(assist::handle_check_key))
        .route("/api/v1/assist/summary", post(assist::handle_improve_summary))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::{CompletionService, KeyCheck, LlmError};

    const BOUNDARY: &str = "resume-builder-test-boundary";

    struct FakeCompletion;

    #[async_trait]
    impl CompletionService for FakeCompletion {
        async fn check_key(&self, api_key: &str) -> KeyCheck {
            match api_key {
                "" => KeyCheck::Missing,
                "sk-good" => KeyCheck::Valid,
                _ => KeyCheck::Invalid,
            }
        }

        async fn improve_summary(&self, api_key: &str, summary: &str) -> Result<String, LlmError> {
            if api_key == "sk-good" {
                Ok(format!("{summary} (revisado)"))
            } else {
                Err(LlmError::Api {
                    status: 401,
                    message: "invalid key".to_string(),
                })
            }
        }
    }

    fn test_state() -> AppState {
        AppState::new(Config::default(), Arc::new(FakeCompletion))
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([20, 40, 60]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn multipart_request(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"preview.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn patch_draft(state: &AppState, field: &str, value: Value) -> Value {
        let response = send(
            state,
            Method::PATCH,
            "/api/v1/experience/draft",
            Some(json!({ "field": field, "value": value })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&test_state(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-builder-api");
    }

    #[tokio::test]
    async fn test_personal_patch_stores_value_and_reports_error() {
        let state = test_state();
        let response = send(
            &state,
            Method::PATCH,
            "/api/v1/personal",
            Some(json!({ "field": "email", "value": "ana@" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["email"], "ana@");
        assert_eq!(body["errors"]["email"], "Digite um e-mail válido");
        assert_eq!(body["is_valid"], false);
    }

    #[tokio::test]
    async fn test_draft_current_job_clears_end_date() {
        let state = test_state();
        patch_draft(&state, "end_date", json!("2024-01-01")).await;
        let body = patch_draft(&state, "current_job", json!(true)).await;
        assert_eq!(body["draft"]["current_job"], true);
        assert_eq!(body["draft"]["end_date"], "");
    }

    #[tokio::test]
    async fn test_draft_commit_flow() {
        let state = test_state();
        patch_draft(&state, "company", json!("Acme")).await;
        patch_draft(&state, "role", json!("Dev")).await;
        patch_draft(&state, "start_date", json!("2023-01-01")).await;
        let body = patch_draft(&state, "current_job", json!(true)).await;
        assert_eq!(body["can_commit"], true);

        let response = send(&state, Method::POST, "/api/v1/experience/draft/commit", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["index"], 0);
        assert_eq!(body["experiences"][0]["company"], "Acme");
        assert_eq!(body["draft"]["draft"]["company"], "");

        let response = send(&state, Method::GET, "/api/v1/resume/preview", None).await;
        let preview = json_body(response).await;
        assert_eq!(preview["experiences"][0]["period"], "jan. de 2023 - Atual");
        assert!(preview["experiences_empty"].is_null());
    }

    #[tokio::test]
    async fn test_draft_commit_rejects_invalid_form() {
        let state = test_state();
        patch_draft(&state, "company", json!("A")).await;

        let response = send(&state, Method::POST, "/api/v1/experience/draft/commit", None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_FORM");
        assert_eq!(body["error"]["fields"]["company"], "Mínimo de 2 caracteres");
        assert!(body["error"]["fields"]["role"].is_string());

        let resume = json_body(send(&state, Method::GET, "/api/v1/resume", None).await).await;
        assert_eq!(resume["experiences"], json!([]));
    }

    #[tokio::test]
    async fn test_validate_record_flags_end_date_with_current_job() {
        let response = send(
            &test_state(),
            Method::POST,
            "/api/v1/experiences/validate",
            Some(json!({
                "company": "Acme",
                "role": "Dev",
                "start_date": "2023-01-01",
                "end_date": "2024-01-01",
                "current_job": true
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["is_valid"], false);
        assert!(body["errors"]["end_date"].is_string());
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_404() {
        let state = test_state();
        let response = send(&state, Method::DELETE, "/api/v1/experiences/0", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&state, Method::DELETE, "/api/v1/skills/2", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_skills_add_and_remove() {
        let state = test_state();
        let response = send(
            &state,
            Method::POST,
            "/api/v1/skills",
            Some(json!({ "name": "Rust", "level": "Avançado" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let skills = json_body(response).await;
        assert_eq!(skills[0]["level"], "Avançado");

        let response = send(
            &state,
            Method::POST,
            "/api/v1/skills",
            Some(json!({ "name": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&state, Method::DELETE, "/api/v1/skills/0", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let resume = json_body(send(&state, Method::GET, "/api/v1/resume", None).await).await;
        assert_eq!(resume["skills"], json!([]));
    }

    #[tokio::test]
    async fn test_export_returns_pdf() {
        let state = test_state();
        let request = multipart_request("/api/v1/export/pdf", "preview", &png(21, 60));
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"curriculo.pdf\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        // 21 px across 210 mm makes 60 px tall 600 mm: three A4 pages.
        assert_eq!(doc.get_pages().len(), 3);
        assert!(!state.export_guard.is_busy());
    }

    #[tokio::test]
    async fn test_export_fit_to_page_query() {
        let request = multipart_request(
            "/api/v1/export/pdf?strategy=fit_to_page",
            "preview",
            &png(21, 60),
        );
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_export_rejected_while_another_runs() {
        let state = test_state();
        let _ticket = state.export_guard.try_acquire().unwrap();

        let request = multipart_request("/api/v1/export/pdf", "preview", &png(4, 4));
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_export_missing_field_is_400_and_releases_guard() {
        let state = test_state();
        let request = multipart_request("/api/v1/export/pdf", "other", &png(4, 4));
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!state.export_guard.is_busy());
    }

    #[tokio::test]
    async fn test_export_over_page_limit_is_400() {
        let config = Config {
            max_export_pages: 2,
            ..Config::default()
        };
        let state = AppState::new(config, Arc::new(FakeCompletion));
        let request = multipart_request("/api/v1/export/pdf", "preview", &png(21, 60));
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"]["message"],
            "preview needs 3 pages, more than the limit of 2"
        );
        assert!(!state.export_guard.is_busy());
    }

    #[tokio::test]
    async fn test_export_garbage_image_is_400() {
        let request = multipart_request("/api/v1/export/pdf", "preview", b"not an image");
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_saved_pdf_reloads_from_disk() {
        let request = multipart_request("/api/v1/export/pdf", "preview", &png(30, 20));
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curriculo.pdf");
        std::fs::write(&path, &bytes).unwrap();
        let doc = lopdf::Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_assist_key_check() {
        let response = send(
            &test_state(),
            Method::POST,
            "/api/v1/assist/key",
            Some(json!({ "api_key": "sk-good" })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["status"], "valid");
        assert_eq!(body["message"], "API Key válida!");
        assert_eq!(body["ai_active"], true);
    }

    #[tokio::test]
    async fn test_assist_summary_applies_into_personal_data() {
        let state = test_state();
        let response = send(
            &state,
            Method::POST,
            "/api/v1/assist/summary",
            Some(json!({ "api_key": "sk-good", "summary": "Dev backend", "apply": true })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["summary"], "Dev backend (revisado)");
        assert_eq!(body["applied"], true);

        let resume = json_body(send(&state, Method::GET, "/api/v1/resume", None).await).await;
        assert_eq!(resume["personal"]["summary"], "Dev backend (revisado)");
    }

    #[tokio::test]
    async fn test_assist_summary_errors() {
        let state = test_state();
        let response = send(
            &state,
            Method::POST,
            "/api/v1/assist/summary",
            Some(json!({ "api_key": "sk-good", "summary": "  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &state,
            Method::POST,
            "/api/v1/assist/summary",
            Some(json!({ "api_key": "sk-bad", "summary": "Dev" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "Falha OpenAI: 401 - invalid key");
    }
}
