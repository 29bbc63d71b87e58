//! Service entry point: wire components explicitly and serve the API.

use maternal_rag::{
    api::{build_router, AppState},
    config::{Config, EmbeddingProvider},
    content::{ContentStore, ContentStoreConfig},
    patient::{PatientBackendClient, PatientContextProvider},
    personalization::{LlmGenerator, PersonalizationEngine},
    pipeline::PersonalizedContentService,
    vector::{ApiEmbedder, Embedder, HashEmbedder, InMemoryVectorBackend, QdrantBackend, VectorBackend},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let embedder: Arc<dyn Embedder> = match config.embedding.provider {
        EmbeddingProvider::Hash => Arc::new(HashEmbedder::new(config.vector_db.vector_size)),
        EmbeddingProvider::Api => Arc::new(ApiEmbedder::new(
            config.embedding.clone(),
            config.vector_db.vector_size,
        )?),
    };

    let backend: Arc<dyn VectorBackend> = if config.vector_db.url.is_empty() {
        warn!("No vector database configured, using the in-process index");
        Arc::new(InMemoryVectorBackend::new())
    } else {
        Arc::new(QdrantBackend::new(config.vector_db.clone())?)
    };

    let store = Arc::new(ContentStore::new(ContentStoreConfig::default(), backend, embedder).await);

    let patients = Arc::new(PatientContextProvider::new(Arc::new(
        PatientBackendClient::new(config.patient_backend.clone())?,
    )));

    let generator = LlmGenerator::new(config.generation.clone())
        .map_err(|e| anyhow::anyhow!("failed to build generation client: {}", e))?;
    let engine = Arc::new(PersonalizationEngine::new(
        Arc::new(generator),
        config.generation.max_tokens,
    ));

    let service = Arc::new(PersonalizedContentService::new(store, patients, engine));
    let router = build_router(AppState { service });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
