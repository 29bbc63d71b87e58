//! In-process vector index
//!
//! Brute-force cosine scan over all stored points. Adequate for the
//! 40-record reference dataset and used wherever no Qdrant instance is
//! configured, including tests.

use super::backend::{VectorBackend, VectorMatch, VectorPoint};
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[derive(Default)]
pub struct InMemoryVectorBackend {
    points: DashMap<u64, Vec<f32>>,
}

impl InMemoryVectorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[async_trait]
impl VectorBackend for InMemoryVectorBackend {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()> {
        for point in points {
            self.points.insert(point.id, point.vector);
        }
        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<VectorMatch>> {
        let mut matches: Vec<VectorMatch> = self
            .points
            .iter()
            .map(|entry| VectorMatch {
                id: *entry.key(),
                score: cosine_similarity(&vector, entry.value()),
            })
            .collect();

        // Score descending, id ascending on ties, for a stable ranking.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        matches.truncate(limit);

        Ok(matches)
    }
}
