//! Execution dispatch - validate, send to the runner, interpret the reply
//!
//! The runner itself is an external collaborator behind [`WorkflowRunner`];
//! the dispatcher only prepares a single execution request and surfaces what
//! comes back.

use async_trait::async_trait;
use flowdeck_core::{RunError, Workflow};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::validate::validate;

/// Successful reply from the workflow runner. Either field may be absent;
/// empty strings are treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RunnerReply {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A failed run call: the backend-provided detail when the runner reported
/// one, plus the raw transport error as fallback.
#[derive(Clone, Debug)]
pub struct RunnerFailure {
    pub detail: Option<String>,
    pub transport: String,
}

/// The external workflow-runner collaborator.
#[async_trait]
pub trait WorkflowRunner: Send + Sync {
    async fn run_workflow(&self, workflow: &Workflow) -> Result<RunnerReply, RunnerFailure>;
}

/// What a completed run surfaced to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub message: String,
}

/// Orchestrates validate -> dispatch -> interpret. Fire-and-once: no retry,
/// no partial results; a failed run leaves the graph untouched and reports
/// the failure to the caller.
pub struct ExecutionDispatcher {
    runner: Arc<dyn WorkflowRunner>,
}

impl ExecutionDispatcher {
    pub fn new(runner: Arc<dyn WorkflowRunner>) -> Self {
        Self { runner }
    }

    pub async fn run(&self, workflow: &Workflow) -> Result<ExecutionOutcome, RunError> {
        // Validation failures never reach the runner.
        validate(workflow)?;

        match self.runner.run_workflow(workflow).await {
            Ok(reply) => {
                let message = reply
                    .result
                    .filter(|s| !s.is_empty())
                    .or(reply.message.filter(|s| !s.is_empty()))
                    .unwrap_or_else(|| "Workflow executed.".to_string());
                info!(
                    nodes = workflow.nodes.len(),
                    edges = workflow.edges.len(),
                    "workflow run complete"
                );
                Ok(ExecutionOutcome { message })
            }
            Err(failure) => {
                warn!(transport = %failure.transport, "workflow run failed");
                Err(RunError::Failed(
                    failure.detail.unwrap_or(failure.transport),
                ))
            }
        }
    }
}
