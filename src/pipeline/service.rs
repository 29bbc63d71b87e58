//! Pipeline orchestration
//!
//! One request flows content store -> patient context -> engine ->
//! assembler. Components are injected at construction; there is no
//! process-global service state.

use super::assembler;
use crate::content::ContentStore;
use crate::error::{Result, ServiceError};
use crate::metrics::METRICS;
use crate::patient::{PatientContextProvider, ProfileSource};
use crate::personalization::{PersonalizationEngine, PersonalizationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Parameters for one personalization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizationRequest {
    pub week: u32,
    pub patient_id: String,
    #[serde(default)]
    pub use_ai: bool,
    #[serde(default = "default_profile_source")]
    pub profile_source: ProfileSource,
}

fn default_profile_source() -> ProfileSource {
    ProfileSource::Mock
}

pub struct PersonalizedContentService {
    store: Arc<ContentStore>,
    patients: Arc<PatientContextProvider>,
    engine: Arc<PersonalizationEngine>,
}

impl PersonalizedContentService {
    pub fn new(
        store: Arc<ContentStore>,
        patients: Arc<PatientContextProvider>,
        engine: Arc<PersonalizationEngine>,
    ) -> Self {
        Self {
            store,
            patients,
            engine,
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// Personalize one week for one patient.
    ///
    /// An invalid week propagates as `NotFound`. An unresolvable profile
    /// in backend mode degrades to base content with the degraded status
    /// flag set; it never invents a profile and never fails the request.
    pub async fn personalized_week(
        &self,
        request: PersonalizationRequest,
    ) -> Result<PersonalizationResult> {
        let record = match self.store.get_week(request.week) {
            Ok(record) => record,
            Err(e) => {
                METRICS.record_personalization("error");
                return Err(e);
            }
        };

        let profile = match self
            .patients
            .get_profile(&request.patient_id, request.profile_source)
            .await
        {
            Ok(profile) => profile,
            Err(ServiceError::ProfileUnavailable(reason)) => {
                warn!(
                    "Profile unavailable for {}, returning base content: {}",
                    request.patient_id, reason
                );
                METRICS.record_personalization("degraded");
                return Ok(assembler::assemble_degraded(
                    &request.patient_id,
                    record,
                    format!("profile unavailable: {}", reason),
                ));
            }
            Err(e) => {
                METRICS.record_personalization("error");
                return Err(e);
            }
        };

        let output = self
            .engine
            .personalize(record, &profile, request.use_ai)
            .await;

        let result = assembler::assemble(&request.patient_id, record, output);
        METRICS.record_personalization(result.status.as_str());

        info!(
            "Personalized week {} for {}: status={}, confidence={}",
            request.week,
            request.patient_id,
            result.status.as_str(),
            result.confidence_score
        );

        Ok(result)
    }
}
