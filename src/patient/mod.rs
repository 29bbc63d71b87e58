//! Patient context provider
//!
//! Resolves a patient id to a medical profile from either the live
//! patient-data backend or the deterministic mock catalog.

pub mod backend;
pub mod mock;
pub mod models;
pub mod provider;

pub use backend::{PatientBackendClient, ProfileBackend};
pub use mock::{mock_profile, MockProfileKind};
pub use models::{Condition, ConditionCategory, Demographics, PatientProfile, Severity};
pub use provider::{PatientContextProvider, ProfileSource};
