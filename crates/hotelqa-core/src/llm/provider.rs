//! LlmProvider trait definition.
//!
//! This is the capability interface the answer composer calls when no
//! structured rule can answer a question. Uses RPITIT for `complete`.

use hotelqa_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-completion backends (OpenAI-compatible servers, test stubs).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in hotelqa-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "local").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
