//! flowdeck-core - data model and error types for the workflow graph engine

pub mod error;
pub mod types;

pub use error::{
    ExportError, GraphError, ImportError, PolicyViolation, RunError, ValidationError,
};
pub use types::*;
