//! Inference provider trait

use async_trait::async_trait;

/// Result type for inference operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Inference error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// An inference backend the workflow runner can ask a question, optionally
/// grounded in knowledge-base context.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Answer `prompt`, grounded in `context` when it is non-empty.
    async fn ask(&self, prompt: &str, context: &str) -> LlmResult<String>;
}

/// Frame the prompt with knowledge-base context. Empty context means the
/// prompt goes through untouched.
pub fn compose_prompt(prompt: &str, context: &str) -> String {
    if context.trim().is_empty() {
        prompt.to_string()
    } else {
        format!("Context:\n{}\n\nQuestion:\n{}", context, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_prompt_without_context_is_identity() {
        assert_eq!(compose_prompt("Hi", ""), "Hi");
        assert_eq!(compose_prompt("Hi", "   "), "Hi");
    }

    #[test]
    fn compose_prompt_frames_context_before_question() {
        let framed = compose_prompt("What is the total?", "Invoice: 12 EUR");
        assert_eq!(
            framed,
            "Context:\nInvoice: 12 EUR\n\nQuestion:\nWhat is the total?"
        );
    }
}
