//! Vector search backends and embedders
//!
//! The content store talks to a [`VectorBackend`] through a trait seam so
//! the same pipeline runs against Qdrant in production and the in-process
//! index in tests.

pub mod backend;
pub mod embedding;
pub mod memory;
pub mod qdrant;

pub use backend::{VectorBackend, VectorMatch, VectorPoint};
pub use embedding::{ApiEmbedder, Embedder, HashEmbedder};
pub use memory::InMemoryVectorBackend;
pub use qdrant::QdrantBackend;
