//! Personalized pregnancy content service
//!
//! A RAG pipeline over a static 40-week reference dataset:
//! 1. The content store resolves the base week record, or ranks all
//!    weeks against a semantic query via the vector index.
//! 2. The patient context provider resolves a patient id to a medical
//!    profile, from the live backend or the deterministic mock catalog.
//! 3. The personalization engine annotates each key development, using
//!    the text-generation backend when available and condition-keyed
//!    rule templates otherwise.
//! 4. The assembler merges everything into the response payload.
//!
//! Enrichment failures (vector backend, generation backend, patient
//! backend) degrade the response instead of failing it; only invalid
//! lookups surface as errors.

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod metrics;
pub mod patient;
pub mod personalization;
pub mod pipeline;
pub mod vector;

pub use config::Config;
pub use error::{Result, ServiceError};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::content::{ContentStore, ContentStoreConfig, PregnancyWeekRecord};
    pub use crate::error::{Result, ServiceError};
    pub use crate::patient::{PatientContextProvider, PatientProfile, ProfileSource};
    pub use crate::personalization::{
        PersonalizationEngine, PersonalizationResult, PersonalizationStatus, RiskLevel,
    };
    pub use crate::pipeline::{PersonalizationRequest, PersonalizedContentService};
    pub use crate::vector::{Embedder, HashEmbedder, InMemoryVectorBackend, VectorBackend};
}
