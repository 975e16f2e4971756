//! Workflow execution pipeline
//!
//! validate -> prompt -> optional document context -> provider -> answer.
//! Every failure along the way is a [`RunRejection`] with a human-readable
//! detail string; the server turns those into structured error replies.

use crate::server::RunnerState;
use flowdeck_core::{ModelKind, OutputFormat, StageConfig, Workflow};
use flowdeck_engine::validate;
use serde::Serialize;
use tracing::{info, warn};

/// Successful run reply.
#[derive(Clone, Debug, Serialize)]
pub struct RunReply {
    pub status: String,
    pub message: String,
    pub result: String,
}

/// A run that could not complete. `detail` is shown to the user as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRejection {
    pub detail: String,
}

impl RunRejection {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Execute a workflow graph end to end.
pub async fn execute(state: &RunnerState, workflow: &Workflow) -> Result<RunReply, RunRejection> {
    validate(workflow).map_err(|e| RunRejection::new(e.to_string()))?;

    let prompt = workflow
        .nodes
        .iter()
        .find_map(|n| match &n.stage {
            StageConfig::UserQuery { prompt } if !prompt.trim().is_empty() => Some(prompt.clone()),
            _ => None,
        })
        .ok_or_else(|| RunRejection::new("no user query prompt provided"))?;

    let document = workflow.nodes.iter().find_map(|n| match &n.stage {
        StageConfig::KnowledgeBase {
            filename: Some(filename),
            ..
        } if !filename.is_empty() => Some(filename.clone()),
        _ => None,
    });

    let context = match document {
        Some(filename) => {
            state.documents.document_text(&filename).await.map_err(|e| {
                warn!(filename, error = %e, "document text fetch failed");
                RunRejection::new(format!("could not read document '{}': {}", filename, e))
            })?
        }
        None => String::new(),
    };

    let model = workflow
        .nodes
        .iter()
        .find_map(|n| match &n.stage {
            StageConfig::LlmEngine { model } => Some(*model),
            _ => None,
        })
        .unwrap_or_default();

    let provider = match model {
        ModelKind::Gemini => state
            .gemini
            .as_ref()
            .ok_or_else(|| RunRejection::new("GEMINI_API_KEY is not configured"))?,
        ModelKind::OpenAi => state
            .openai
            .as_ref()
            .ok_or_else(|| RunRejection::new("OPENAI_API_KEY is not configured"))?,
    };

    info!(provider = provider.name(), "running workflow");

    let answer = provider
        .ask(&prompt, &context)
        .await
        .map_err(|e| RunRejection::new(e.to_string()))?;

    let format = workflow
        .nodes
        .iter()
        .find_map(|n| match &n.stage {
            StageConfig::Output { format } => Some(*format),
            _ => None,
        })
        .unwrap_or_default();

    let result = match format {
        OutputFormat::Text => answer,
        OutputFormat::Json => serde_json::json!({ "answer": answer }).to_string(),
    };

    Ok(RunReply {
        status: "success".to_string(),
        message: "Workflow executed.".to_string(),
        result,
    })
}
