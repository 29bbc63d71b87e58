//! Pregnancy reference content
//!
//! Static 40-week dataset with week-indexed and semantic lookup:
//! - by week number and by trimester, served from memory
//! - by similarity query, served from the vector index built at startup

pub mod dataset;
pub mod models;
pub mod store;

pub use models::{trimester_for_week, BabySize, KeyDevelopment, PregnancyWeekRecord};
pub use store::{ContentStore, ContentStoreConfig};
