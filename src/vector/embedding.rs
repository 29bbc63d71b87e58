//! Text embedding
//!
//! Two implementations: a remote sentence-embedding API and a pure
//! feature-hashing embedder. Both are deterministic for identical input
//! text, which keeps search rankings reproducible in tests.

use crate::config::EmbeddingConfig;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

/// Deterministic feature-hashing embedder.
///
/// Each lowercased alphanumeric token is hashed into a bucket with a
/// hash-derived sign, and the resulting vector is L2-normalized. Not a
/// semantic model, but stable across runs and platforms, which makes it
/// the default for tests and for deployments without an embedding API.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let bucket = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
                % self.dimension;
            let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Remote embedding API client (OpenAI-compatible `/embeddings` shape).
pub struct ApiEmbedder {
    client: Client,
    config: EmbeddingConfig,
    dimension: usize,
}

impl ApiEmbedder {
    pub fn new(config: EmbeddingConfig, dimension: usize) -> Result<Self> {
        if config.api_url.is_empty() {
            return Err(ServiceError::Config(
                "embedding.api_url is required for the api embedding provider".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config,
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Embedding {} chars via {}", text.len(), self.config.model);

        let request = EmbeddingRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
        };

        let mut req = self.client.post(&self.config.api_url).json(&request);
        if let Some(token) = &self.config.api_token {
            req = req.bearer_auth(token.expose_secret());
        }

        let response = req
            .send()
            .await
            .map_err(|e| ServiceError::BackendUnavailable(format!("embedding request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::BackendUnavailable(format!(
                "embedding API status {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::BackendUnavailable(format!("embedding response: {}", e)))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                ServiceError::BackendUnavailable("embedding API returned no data".to_string())
            })?;

        if embedding.len() != self.dimension {
            return Err(ServiceError::BackendUnavailable(format!(
                "embedding dimension {} does not match configured {}",
                embedding.len(),
                self.dimension
            )));
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = tokio_test::block_on(embedder.embed("week 15 pregnancy developments")).unwrap();
        let b = tokio_test::block_on(embedder.embed("week 15 pregnancy developments")).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hash_embedder_is_normalized() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed("heart begins beating").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_hash_embedder_distinguishes_texts() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("neural tube development").await.unwrap();
        let b = embedder.embed("third trimester kicks").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_hash_embedder_empty_text() {
        let embedder = HashEmbedder::new(16);
        let v = embedder.embed("").await.unwrap();
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_api_embedder_requires_url() {
        let config = EmbeddingConfig::default();
        assert!(ApiEmbedder::new(config, 384).is_err());
    }

    #[tokio::test]
    async fn test_api_embedder_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#)
            .create_async()
            .await;

        let config = EmbeddingConfig {
            api_url: format!("{}/embeddings", server.url()),
            ..EmbeddingConfig::default()
        };
        let embedder = ApiEmbedder::new(config, 3).unwrap();
        let v = embedder.embed("hello").await.unwrap();
        assert_eq!(v, vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_embedder_maps_errors_to_backend_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(500)
            .create_async()
            .await;

        let config = EmbeddingConfig {
            api_url: format!("{}/embeddings", server.url()),
            ..EmbeddingConfig::default()
        };
        let embedder = ApiEmbedder::new(config, 3).unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
