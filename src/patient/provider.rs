//! Patient context resolution

use super::backend::ProfileBackend;
use super::mock::mock_profile;
use super::models::PatientProfile;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Where a profile should come from. Backend mode never silently falls
/// back to mock data; the caller decides what an unavailable profile
/// means for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Backend,
    Mock,
}

pub struct PatientContextProvider {
    backend: Arc<dyn ProfileBackend>,
}

impl PatientContextProvider {
    pub fn new(backend: Arc<dyn ProfileBackend>) -> Self {
        Self { backend }
    }

    /// Resolve a patient id to a profile.
    ///
    /// Mock mode is pure and total. Backend mode propagates
    /// `ProfileUnavailable` on 404 or transport failure.
    pub async fn get_profile(
        &self,
        patient_id: &str,
        source: ProfileSource,
    ) -> Result<PatientProfile> {
        match source {
            ProfileSource::Mock => {
                debug!("Resolving mock profile for {}", patient_id);
                Ok(mock_profile(patient_id))
            }
            ProfileSource::Backend => self.backend.fetch_profile(patient_id).await,
        }
    }
}
