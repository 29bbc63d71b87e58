//! Qdrant-backed vector index

use super::backend::{VectorBackend, VectorMatch, VectorPoint};
use crate::config::VectorDbConfig;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        point_id::PointIdOptions, value::Kind, CreateCollection, Distance, PointStruct,
        SearchPoints, Value, VectorParams, VectorsConfig,
    },
};
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

pub struct QdrantBackend {
    client: QdrantClient,
    config: VectorDbConfig,
    collection_ready: AtomicBool,
}

impl QdrantBackend {
    pub fn new(config: VectorDbConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ServiceError::Config(
                "vector_db.url is required for the qdrant backend".to_string(),
            ));
        }

        let mut builder = QdrantClient::from_url(&config.url);
        if let Some(api_key) = &config.api_key {
            builder = builder.with_api_key(api_key.expose_secret().as_str());
        }

        let client = builder
            .build()
            .map_err(|e| ServiceError::Config(format!("failed to build qdrant client: {}", e)))?;

        Ok(Self {
            client,
            config,
            collection_ready: AtomicBool::new(false),
        })
    }

    /// Create the collection if it does not exist yet. Checked once per
    /// process; upserts are keyed by week number so repeated startups
    /// never duplicate entries.
    async fn ensure_collection(&self) -> Result<()> {
        if self.collection_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| ServiceError::BackendUnavailable(format!("list collections: {}", e)))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.config.collection_name);

        if !exists {
            info!("Creating collection: {}", self.config.collection_name);

            self.client
                .create_collection(&CreateCollection {
                    collection_name: self.config.collection_name.clone(),
                    vectors_config: Some(VectorsConfig {
                        config: Some(qdrant_client::qdrant::vectors_config::Config::Params(
                            VectorParams {
                                size: self.config.vector_size as u64,
                                distance: Distance::Cosine.into(),
                                ..Default::default()
                            },
                        )),
                    }),
                    ..Default::default()
                })
                .await
                .map_err(|e| {
                    ServiceError::BackendUnavailable(format!("create collection: {}", e))
                })?;
        }

        self.collection_ready.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl VectorBackend for QdrantBackend {
    async fn upsert(&self, points: Vec<VectorPoint>) -> Result<()> {
        self.ensure_collection().await?;

        debug!(
            "Upserting {} points into {}",
            points.len(),
            self.config.collection_name
        );

        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload: HashMap<String, Value> = p
                    .payload
                    .as_object()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(k, v)| qdrant_value(v).map(|v| (k, v)))
                    .collect();
                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(&self.config.collection_name, None, points, None)
            .await
            .map_err(|e| ServiceError::BackendUnavailable(format!("upsert points: {}", e)))?;

        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<VectorMatch>> {
        let result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.config.collection_name.clone(),
                vector,
                limit: limit as u64,
                ..Default::default()
            })
            .await
            .map_err(|e| ServiceError::BackendUnavailable(format!("search points: {}", e)))?;

        let matches = result
            .result
            .into_iter()
            .filter_map(|point| {
                let id = match point.id.and_then(|id| id.point_id_options) {
                    Some(PointIdOptions::Num(num)) => num,
                    _ => return None,
                };
                Some(VectorMatch {
                    id,
                    score: point.score,
                })
            })
            .collect();

        Ok(matches)
    }
}

/// Map the scalar payload kinds onto the wire representation. Nested
/// structures are not stored; the index only carries scalars.
fn qdrant_value(value: serde_json::Value) -> Option<Value> {
    let kind = match value {
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Kind::IntegerValue(i)
            } else {
                Kind::DoubleValue(n.as_f64()?)
            }
        }
        _ => return None,
    };
    Some(Value { kind: Some(kind) })
}
