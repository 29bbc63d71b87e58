//! Vector backend abstraction

use crate::error::Result;
use async_trait::async_trait;

/// A vector with its stable primary key and searchable payload.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: u64,
    pub score: f32,
}

/// Minimal vector index surface the content store needs: idempotent
/// upsert by primary key plus ranked similarity query.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Insert or replace points by id. Calling twice with the same ids
    /// must not create duplicates.
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()>;

    /// Return up to `limit` matches ranked by similarity, best first.
    async fn query(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<VectorMatch>>;
}
