//! Workflow readiness validation - the gate for both export and execution

use flowdeck_core::{StageConfig, StageType, ValidationError, Workflow};
use std::collections::HashSet;

/// Check a workflow's readiness. Short-circuits on the first failure, in
/// order: required stages, connectivity, per-stage config completeness.
///
/// The connectivity check applies uniformly to every node - an isolated
/// Output node fails like any other.
pub fn validate(workflow: &Workflow) -> Result<(), ValidationError> {
    // Required stages, matched by stage type. Labels are user-editable and
    // say nothing about a node's role.
    for required in StageType::ALL {
        if !workflow.nodes.iter().any(|n| n.stage_type() == required) {
            return Err(ValidationError::MissingStage(required));
        }
    }

    // Every node must appear as an endpoint of at least one edge.
    let connected: HashSet<&str> = workflow
        .edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();
    for node in &workflow.nodes {
        if !connected.contains(node.id.as_str()) {
            return Err(ValidationError::Disconnected(
                node.display_label().to_string(),
            ));
        }
    }

    // Per-stage configuration completeness. Model and format are enum-typed
    // with defaults and cannot be empty; the arms stay explicit so the pass
    // covers every stage type.
    for node in &workflow.nodes {
        match &node.stage {
            StageConfig::UserQuery { prompt } if prompt.trim().is_empty() => {
                return Err(ValidationError::MissingConfig {
                    stage: StageType::UserQuery,
                    label: node.display_label().to_string(),
                    field: "prompt",
                });
            }
            StageConfig::UserQuery { .. }
            | StageConfig::KnowledgeBase { .. }
            | StageConfig::LlmEngine { .. }
            | StageConfig::Output { .. } => {}
        }
    }

    Ok(())
}
