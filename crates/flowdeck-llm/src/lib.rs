//! flowdeck-llm - inference-backend collaborators
//!
//! One request/response `ask(prompt, context)` per provider; the engine does
//! not stream.

pub mod gemini;
pub mod openai;
pub mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{compose_prompt, InferenceProvider, LlmError, LlmResult};
