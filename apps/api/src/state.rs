use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::export::ExportGuard;
use crate::llm_client::CompletionService;
use crate::workspace::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<RwLock<Workspace>>,
    /// Completion provider. `LlmClient` in production, a fake in tests.
    pub completion: Arc<dyn CompletionService>,
    /// At most one PDF export in flight.
    pub export_guard: ExportGuard,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, completion: Arc<dyn CompletionService>) -> Self {
        AppState {
            workspace: Arc::new(RwLock::new(Workspace::default())),
            completion,
            export_guard: ExportGuard::default(),
            config,
        }
    }
}
