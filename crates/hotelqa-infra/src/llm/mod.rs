//! LLM provider construction for the generative fallback.

pub mod openai_compat;

use secrecy::SecretString;

use hotelqa_core::llm::BoxLlmProvider;
use hotelqa_types::config::LlmConfig;
use hotelqa_types::llm::LlmError;

use self::openai_compat::{OpenAiCompatConfig, OpenAiCompatibleProvider};

/// Read the API key named by `config.api_key_env`.
///
/// Returns `Ok(None)` when no variable is configured. A configured but unset
/// variable is an authentication error.
pub fn resolve_api_key(config: &LlmConfig) -> Result<Option<SecretString>, LlmError> {
    match config.api_key_env.as_deref() {
        None => Ok(None),
        Some(var) => match std::env::var(var) {
            Ok(key) if !key.is_empty() => Ok(Some(SecretString::from(key))),
            _ => {
                tracing::warn!(env = var, "API key variable is not set");
                Err(LlmError::AuthenticationFailed)
            }
        },
    }
}

/// Create a [`BoxLlmProvider`] from the `[llm]` config section.
///
/// The configured `base_url` is always honored; `provider_name` is only a
/// label. A keyless provider gets an empty API key.
pub fn create_provider(config: &LlmConfig, api_key: Option<SecretString>) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: config.provider_name.clone(),
        base_url: config.base_url.clone(),
        api_key: api_key.unwrap_or_else(|| SecretString::from(String::new())),
        model: config.model.clone(),
    });
    tracing::debug!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "LLM provider configured"
    );
    BoxLlmProvider::new(provider)
}
