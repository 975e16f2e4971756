//! flowdeck-client - HTTP clients for the runner backend
//!
//! Two collaborators live here: the document store (PDF upload, listing,
//! extracted text) and the HTTP workflow runner the engine dispatches to.

pub mod documents;
pub mod runner;

pub use documents::{DocumentMeta, DocumentStoreClient, UploadReceipt};
pub use runner::HttpWorkflowRunner;

/// Client-side error for document-store calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
