//! Content store: week-indexed and semantically searchable access to the
//! 40-week reference dataset

use super::dataset;
use super::models::{PregnancyWeekRecord, MAX_WEEK, MIN_WEEK};
use crate::error::{Result, ServiceError};
use crate::vector::{Embedder, VectorBackend, VectorPoint};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Content store configuration
#[derive(Debug, Clone)]
pub struct ContentStoreConfig {
    pub default_search_limit: usize,
    pub max_search_limit: usize,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            default_search_limit: 5,
            max_search_limit: 20,
        }
    }
}

/// Read-only store over the reference dataset.
///
/// Week and trimester lookups are served from memory and always work.
/// Semantic search additionally needs the vector index, which is
/// populated exactly once at construction; if that population fails the
/// store still comes up, search degrades to `BackendUnavailable`, and no
/// re-indexing is attempted per query.
pub struct ContentStore {
    weeks: BTreeMap<u8, PregnancyWeekRecord>,
    backend: Arc<dyn VectorBackend>,
    embedder: Arc<dyn Embedder>,
    config: ContentStoreConfig,
    index_ready: AtomicBool,
}

impl ContentStore {
    pub async fn new(
        config: ContentStoreConfig,
        backend: Arc<dyn VectorBackend>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let weeks: BTreeMap<u8, PregnancyWeekRecord> = dataset::reference_weeks()
            .iter()
            .map(|r| (r.week, r.clone()))
            .collect();

        let store = Self {
            weeks,
            backend,
            embedder,
            config,
            index_ready: AtomicBool::new(false),
        };

        match store.build_index().await {
            Ok(()) => {
                store.index_ready.store(true, Ordering::Release);
                info!("Indexed {} pregnancy weeks", store.weeks.len());
            }
            Err(e) => {
                warn!("Vector index unavailable, semantic search degraded: {}", e);
            }
        }

        store
    }

    /// Embed every week document and upsert it with the week number as
    /// the point id, so restarts overwrite instead of duplicating.
    async fn build_index(&self) -> Result<()> {
        let mut points = Vec::with_capacity(self.weeks.len());

        for record in self.weeks.values() {
            let text = record.document_text();
            let vector = self.embedder.embed(&text).await?;
            points.push(VectorPoint {
                id: record.week as u64,
                vector,
                payload: serde_json::json!({
                    "week": record.week,
                    "trimester": record.trimester,
                    "text_content": text,
                }),
            });
        }

        self.backend.upsert(points).await
    }

    pub fn config(&self) -> &ContentStoreConfig {
        &self.config
    }

    /// Whether the vector index was populated at startup.
    pub fn search_ready(&self) -> bool {
        self.index_ready.load(Ordering::Acquire)
    }

    pub fn get_week(&self, week: u32) -> Result<&PregnancyWeekRecord> {
        if week < MIN_WEEK as u32 || week > MAX_WEEK as u32 {
            return Err(ServiceError::NotFound(format!(
                "week {} is outside the supported range {}-{}",
                week, MIN_WEEK, MAX_WEEK
            )));
        }

        self.weeks
            .get(&(week as u8))
            .ok_or_else(|| ServiceError::NotFound(format!("week {} has no record", week)))
    }

    pub fn get_trimester(&self, trimester: u32) -> Result<Vec<&PregnancyWeekRecord>> {
        if !(1..=3).contains(&trimester) {
            return Err(ServiceError::NotFound(format!(
                "trimester {} is outside the supported range 1-3",
                trimester
            )));
        }

        Ok(self
            .weeks
            .values()
            .filter(|r| r.trimester as u32 == trimester)
            .collect())
    }

    /// Rank all weeks against the query by cosine similarity. Results are
    /// ordered by score descending with ties broken by week ascending.
    pub async fn semantic_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(PregnancyWeekRecord, f32)>> {
        if !self.search_ready() {
            return Err(ServiceError::BackendUnavailable(
                "content index was not populated at startup".to_string(),
            ));
        }

        let limit = if limit == 0 {
            self.config.default_search_limit
        } else {
            limit.min(self.config.max_search_limit)
        };

        let vector = self.embedder.embed(query).await?;
        let mut matches = self.backend.query(vector, limit).await?;

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let mut results = Vec::with_capacity(matches.len());
        for m in matches {
            match self.weeks.get(&(m.id as u8)) {
                Some(record) => results.push((record.clone(), m.score)),
                None => warn!("Vector index returned unknown week id {}", m.id),
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{HashEmbedder, InMemoryVectorBackend};

    async fn test_store() -> ContentStore {
        ContentStore::new(
            ContentStoreConfig::default(),
            Arc::new(InMemoryVectorBackend::new()),
            Arc::new(HashEmbedder::new(64)),
        )
        .await
    }

    #[tokio::test]
    async fn test_get_week_valid_range() {
        let store = test_store().await;
        for week in 1..=40 {
            let record = store.get_week(week).unwrap();
            assert_eq!(record.week as u32, week);
        }
    }

    #[tokio::test]
    async fn test_get_week_out_of_range() {
        let store = test_store().await;
        for week in [0, 41, 100, 1000] {
            assert!(matches!(
                store.get_week(week),
                Err(ServiceError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_get_trimester_partitions() {
        let store = test_store().await;
        assert_eq!(store.get_trimester(1).unwrap().len(), 13);
        assert_eq!(store.get_trimester(2).unwrap().len(), 14);
        assert_eq!(store.get_trimester(3).unwrap().len(), 13);
        assert!(store.get_trimester(0).is_err());
        assert!(store.get_trimester(4).is_err());
    }

    #[tokio::test]
    async fn test_semantic_search_is_idempotent() {
        let store = test_store().await;
        let first = store.semantic_search("heart begins beating", 5).await.unwrap();
        let second = store.semantic_search("heart begins beating", 5).await.unwrap();

        let first_weeks: Vec<u8> = first.iter().map(|(r, _)| r.week).collect();
        let second_weeks: Vec<u8> = second.iter().map(|(r, _)| r.week).collect();
        assert_eq!(first_weeks, second_weeks);
        assert_eq!(first.len(), 5);
    }

    #[tokio::test]
    async fn test_semantic_search_scores_descend() {
        let store = test_store().await;
        let results = store.semantic_search("baby kicks movement", 10).await.unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[tokio::test]
    async fn test_semantic_search_clamps_limit() {
        let store = test_store().await;
        let results = store.semantic_search("development", 500).await.unwrap();
        assert!(results.len() <= store.config().max_search_limit);
    }

    #[tokio::test]
    async fn test_search_degrades_when_index_missing() {
        // An embedder whose dimension never matches any stored vector is
        // not the failure here; instead simulate an unavailable backend
        // by failing the upsert.
        struct FailingBackend;

        #[async_trait::async_trait]
        impl crate::vector::VectorBackend for FailingBackend {
            async fn upsert(&self, _points: Vec<VectorPoint>) -> Result<()> {
                Err(ServiceError::BackendUnavailable("down".to_string()))
            }
            async fn query(
                &self,
                _vector: Vec<f32>,
                _limit: usize,
            ) -> Result<Vec<crate::vector::VectorMatch>> {
                Err(ServiceError::BackendUnavailable("down".to_string()))
            }
        }

        let store = ContentStore::new(
            ContentStoreConfig::default(),
            Arc::new(FailingBackend),
            Arc::new(HashEmbedder::new(64)),
        )
        .await;

        assert!(!store.search_ready());
        // Lookup still works from memory.
        assert!(store.get_week(15).is_ok());
        // Search reports the degraded backend.
        assert!(matches!(
            store.semantic_search("anything", 3).await,
            Err(ServiceError::BackendUnavailable(_))
        ));
    }
}
