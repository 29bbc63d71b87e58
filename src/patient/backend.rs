//! Live patient-profile backend client

use super::models::PatientProfile;
use crate::config::PatientBackendConfig;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::debug;

/// Seam over the external profile store.
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    async fn fetch_profile(&self, patient_id: &str) -> Result<PatientProfile>;
}

/// HTTP client for the patient-data service.
pub struct PatientBackendClient {
    http: Client,
    config: PatientBackendConfig,
}

impl PatientBackendClient {
    pub fn new(config: PatientBackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl ProfileBackend for PatientBackendClient {
    async fn fetch_profile(&self, patient_id: &str) -> Result<PatientProfile> {
        let url = format!("{}/patients/{}", self.config.url, patient_id);
        debug!("Fetching patient profile: {}", patient_id);

        let mut req = self.http.get(&url);
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            ServiceError::ProfileUnavailable(format!("patient backend request: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::ProfileUnavailable(format!(
                "patient {} not found",
                patient_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ProfileUnavailable(format!(
                "patient backend status {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            ServiceError::ProfileUnavailable(format!("patient backend response: {}", e))
        })
    }
}
