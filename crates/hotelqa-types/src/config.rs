//! Global configuration types.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! dataset location, retrieval depth, the generative backend, and the server
//! bind address.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the service.
///
/// Loaded from `~/.hotelqa/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Path to the bookings CSV. Relative paths resolve against the data directory.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_dataset_path() -> String {
    "cleaned_hotel_bookings.csv".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Retrieval depth and index build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Records retrieved when answering a question.
    #[serde(default = "default_ask_top_k")]
    pub ask_top_k: usize,

    /// Records retrieved by a bare `retrieve` call.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Texts per embedding batch when building the index.
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

fn default_ask_top_k() -> usize {
    3
}

fn default_top_k() -> usize {
    20
}

fn default_embed_batch_size() -> usize {
    256
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            ask_top_k: default_ask_top_k(),
            default_top_k: default_top_k(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

/// Generative fallback settings (any OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key. Local servers need none.
    #[serde(default)]
    pub api_key_env: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "local".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_model() -> String {
    "opt-350m".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.dataset_path, "cleaned_hotel_bookings.csv");
        assert_eq!(config.retrieval.ask_top_k, 3);
        assert_eq!(config.retrieval.default_top_k, 20);
        assert_eq!(config.llm.max_tokens, 100);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.retrieval.embed_batch_size, 256);
        assert_eq!(config.llm.timeout_secs, 30);
        assert!(config.llm.api_key_env.is_none());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
dataset_path = "/srv/data/bookings.csv"

[retrieval]
ask_top_k = 5

[llm]
provider_name = "openai"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"

[server]
port = 8080
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dataset_path, "/srv/data/bookings.csv");
        assert_eq!(config.retrieval.ask_top_k, 5);
        assert_eq!(config.retrieval.default_top_k, 20);
        assert_eq!(config.llm.provider_name, "openai");
        assert_eq!(config.llm.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.llm.max_tokens, 100);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let config = GlobalConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.server.host, config.server.host);
    }
}
