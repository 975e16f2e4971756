//! Error types for flowdeck
//!
//! Four user-facing kinds (policy, validation, import, run) plus
//! [`GraphError`] for mutations that referenced something the graph does not
//! hold. All are terminal at the point of detection: the engine never retries
//! and never partially applies a mutation that failed a precondition.

use crate::types::StageType;
use thiserror::Error;

/// Why a proposed connection was rejected. Reported to the caller so the view
/// layer can present actionable feedback; the graph is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("a stage cannot connect to itself")]
    SelfLoop,

    #[error("unknown stage: {0}")]
    UnknownEndpoint(String),

    #[error("Output stages cannot have outgoing connections")]
    OutputAsSource,

    #[error("User Query stages cannot have incoming connections")]
    UserQueryAsTarget,

    #[error("Output stage already has an incoming connection")]
    OutputAlreadyFed,
}

/// Why a workflow is not ready for export or execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required stage: {0}")]
    MissingStage(StageType),

    #[error("stage not connected: {0}")]
    Disconnected(String),

    #[error("{stage} stage \"{label}\" is missing {field}")]
    MissingConfig {
        stage: StageType,
        label: String,
        field: &'static str,
    },
}

/// Why an export produced no document. Validation gates every export;
/// serialization itself can also fail and is reported rather than swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not serialize workflow: {0}")]
    Serialize(String),
}

/// A workflow file that could not be imported. The current graph is never
/// touched when this is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("invalid workflow file: {0}")]
    Parse(String),
}

/// A dispatched execution that did not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to run workflow: {0}")]
    Failed(String),
}

/// A mutation that referenced a node or edge the graph does not hold, or a
/// config patch whose tag does not match the node's stage type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("stage not found: {0}")]
    NodeNotFound(String),

    #[error("connection not found: {0}")]
    EdgeNotFound(String),

    #[error("{patch} config does not apply to {actual} stage: {id}")]
    ConfigMismatch {
        id: String,
        patch: StageType,
        actual: StageType,
    },
}
