//! flowdeck-engine - the workflow graph engine
//!
//! The in-memory graph model and everything that turns it into an execution:
//! mutation commands, the connection policy, readiness validation, the
//! canonical JSON document, and execution dispatch against an external
//! runner.

pub mod command;
pub mod dispatch;
pub mod policy;
pub mod serialize;
pub mod store;
pub mod validate;

pub use command::{Command, CommandEffect, CommandError};
pub use dispatch::{
    ExecutionDispatcher, ExecutionOutcome, RunnerFailure, RunnerReply, WorkflowRunner,
};
pub use policy::can_connect;
pub use serialize::{export_workflow, import_workflow, WORKFLOW_FILENAME};
pub use store::GraphStore;
pub use validate::validate;
