//! Workflow export/import - the canonical JSON document
//!
//! The on-disk format has exactly two top-level fields, `nodes` and `edges`.
//! Field order is stable (struct declaration order) so exports diff cleanly.

use flowdeck_core::{ExportError, ImportError, Workflow};

use crate::validate::validate;

/// Suggested download name for exported documents.
pub const WORKFLOW_FILENAME: &str = "workflow.json";

/// Serialize a workflow to the canonical pretty-printed JSON document.
/// Validation runs first; an invalid workflow produces no output. A
/// serialization failure is reported, never an empty document.
pub fn export_workflow(workflow: &Workflow) -> Result<String, ExportError> {
    validate(workflow)?;
    serde_json::to_string_pretty(workflow).map_err(|e| ExportError::Serialize(e.to_string()))
}

/// Parse a workflow document. A parse failure is reported without touching
/// the caller's graph; parsed data is sanitized (positions, duplicate ids,
/// dangling edges) before it is handed back. Import is a full replace, never
/// a merge. Missing `nodes`/`edges` arrays default to empty.
pub fn import_workflow(raw: &[u8]) -> Result<Workflow, ImportError> {
    let mut workflow: Workflow =
        serde_json::from_slice(raw).map_err(|e| ImportError::Parse(e.to_string()))?;
    workflow.sanitize();
    Ok(workflow)
}
