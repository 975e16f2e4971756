//! HTTP workflow runner

use crate::documents::extract_detail;
use async_trait::async_trait;
use flowdeck_core::Workflow;
use flowdeck_engine::{RunnerFailure, RunnerReply, WorkflowRunner};
use reqwest::Client;
use tracing::debug;

/// [`WorkflowRunner`] that POSTs the workflow graph to a backend over HTTP.
pub struct HttpWorkflowRunner {
    client: Client,
    base_url: String,
}

impl HttpWorkflowRunner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WorkflowRunner for HttpWorkflowRunner {
    async fn run_workflow(&self, workflow: &Workflow) -> Result<RunnerReply, RunnerFailure> {
        debug!(
            nodes = workflow.nodes.len(),
            edges = workflow.edges.len(),
            "dispatching workflow to runner"
        );

        let response = self
            .client
            .post(format!("{}/run-workflow", self.base_url))
            .json(workflow)
            .send()
            .await
            .map_err(|e| RunnerFailure {
                detail: None,
                transport: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RunnerFailure {
            detail: None,
            transport: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(RunnerFailure {
                detail: extract_detail(&body),
                transport: format!("{}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| RunnerFailure {
            detail: None,
            transport: format!("malformed runner reply: {}", e),
        })
    }
}
