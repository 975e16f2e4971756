//! HTTP server for the workflow runner

use crate::service;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use flowdeck_client::DocumentStoreClient;
use flowdeck_core::Workflow;
use flowdeck_llm::{GeminiProvider, InferenceProvider, OpenAiProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Which interface to listen on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindMode {
    #[default]
    Loopback,
    Lan,
}

impl BindMode {
    pub fn to_addr(self) -> &'static str {
        match self {
            BindMode::Loopback => "127.0.0.1",
            BindMode::Lan => "0.0.0.0",
        }
    }
}

pub struct RunnerConfig {
    pub port: u16,
    pub bind: BindMode,
    pub document_store_url: String,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

/// Shared state behind every request handler.
pub struct RunnerState {
    pub documents: DocumentStoreClient,
    pub gemini: Option<Arc<dyn InferenceProvider>>,
    pub openai: Option<Arc<dyn InferenceProvider>>,
}

impl RunnerState {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            documents: DocumentStoreClient::new(config.document_store_url.clone()),
            gemini: config
                .gemini_api_key
                .as_deref()
                .map(|key| Arc::new(GeminiProvider::new(key)) as Arc<dyn InferenceProvider>),
            openai: config
                .openai_api_key
                .as_deref()
                .map(|key| Arc::new(OpenAiProvider::new(key)) as Arc<dyn InferenceProvider>),
        }
    }

    #[doc(hidden)]
    pub fn for_tests(
        gemini: Option<Arc<dyn InferenceProvider>>,
        openai: Option<Arc<dyn InferenceProvider>>,
    ) -> Self {
        Self {
            documents: DocumentStoreClient::new("http://127.0.0.1:0"),
            gemini,
            openai,
        }
    }
}

pub fn build_router(state: Arc<RunnerState>) -> Router {
    Router::new()
        .route("/run-workflow", post(run_workflow_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

pub async fn start_runner(config: RunnerConfig) -> anyhow::Result<()> {
    let state = Arc::new(RunnerState::from_config(&config));

    if state.gemini.is_none() && state.openai.is_none() {
        anyhow::bail!("neither GEMINI_API_KEY nor OPENAI_API_KEY is set");
    }

    let app = build_router(state);

    let bind_addr: SocketAddr = format!("{}:{}", config.bind.to_addr(), config.port).parse()?;

    info!("flowdeck runner v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  Document store: {}", config.document_store_url);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_workflow_handler(
    State(state): State<Arc<RunnerState>>,
    Json(mut workflow): Json<Workflow>,
) -> Response {
    workflow.sanitize();
    match service::execute(&state, &workflow).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(rejection) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": rejection.detail })),
        )
            .into_response(),
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
