//! Service configuration
//!
//! Settings are read from an optional `config.toml` plus `MATERNAL_RAG__*`
//! environment overrides. Every section has defaults so the service starts
//! with no configuration at all (in-process vector index, hash embedder,
//! generation disabled).

use crate::error::{Result, ServiceError};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub vector_db: VectorDbConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub patient_backend: PatientBackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `config.toml` (optional) with environment overrides,
    /// e.g. `MATERNAL_RAG__VECTOR_DB__URL`.
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MATERNAL_RAG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ServiceError::Config(e.to_string()))
    }
}

/// Vector database (Qdrant) settings. An empty `url` selects the
/// in-process index instead.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorDbConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,
}

fn default_collection_name() -> String {
    "pregnancy_weeks".to_string()
}
fn default_vector_size() -> usize {
    384
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            collection_name: default_collection_name(),
            vector_size: default_vector_size(),
        }
    }
}

/// Which embedder implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Deterministic feature-hashing embedder, no external calls.
    Hash,
    /// Remote sentence-embedding API.
    Api,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProvider,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<SecretString>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_embedding_provider() -> EmbeddingProvider {
    EmbeddingProvider::Hash
}
fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}
fn default_embedding_timeout_ms() -> u64 {
    3000
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_url: String::new(),
            api_token: None,
            model: default_embedding_model(),
            timeout_ms: default_embedding_timeout_ms(),
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Text-generation backend settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Enable/disable AI generation globally. When disabled the engine
    /// always uses the rule-based templates.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_generation_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,
    /// Single-attempt request timeout. A slow backend is treated the same
    /// as a failed one: the affected item falls back to the rule templates.
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_generation_url() -> String {
    "http://localhost:8080/v1/chat/completions".to_string()
}
fn default_generation_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_generation_max_tokens() -> usize {
    500
}
fn default_generation_temperature() -> f32 {
    0.2
}
fn default_generation_timeout_ms() -> u64 {
    3000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_generation_url(),
            api_key: None,
            model: default_generation_model(),
            max_tokens: default_generation_max_tokens(),
            temperature: default_generation_temperature(),
            timeout_ms: default_generation_timeout_ms(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Patient-profile backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientBackendConfig {
    #[serde(default = "default_patient_backend_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_patient_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_patient_backend_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_patient_timeout_ms() -> u64 {
    3000
}

impl Default for PatientBackendConfig {
    fn default() -> Self {
        Self {
            url: default_patient_backend_url(),
            api_key: None,
            timeout_ms: default_patient_timeout_ms(),
        }
    }
}

impl PatientBackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.vector_db.url.is_empty());
        assert_eq!(config.vector_db.collection_name, "pregnancy_weeks");
        assert_eq!(config.vector_db.vector_size, 384);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Hash);
        assert!(!config.generation.enabled);
        assert_eq!(config.generation.model, "gpt-3.5-turbo");
        assert_eq!(config.patient_backend.url, "http://localhost:3000");
        assert_eq!(config.server.port, 5002);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.generation.timeout(), Duration::from_millis(3000));
        assert_eq!(config.embedding.timeout(), Duration::from_millis(3000));
        assert_eq!(config.patient_backend.timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = Config::load_from("missing-config-file").unwrap();
        assert_eq!(config.vector_db.collection_name, "pregnancy_weeks");
        assert_eq!(config.generation.max_tokens, 500);
    }
}
