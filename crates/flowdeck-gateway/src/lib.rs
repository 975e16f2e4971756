//! flowdeck-gateway - the workflow-runner service
//!
//! Receives a workflow graph over HTTP, executes it against the configured
//! inference providers and the document store, and replies with a structured
//! result. Failures are structured replies too, never bare 5xx.

pub mod server;
pub mod service;

pub use server::{start_runner, BindMode, RunnerConfig, RunnerState};
pub use service::{execute, RunRejection, RunReply};
