//! Integration tests for the personalization pipeline
//!
//! Exercises the full content-store -> patient-context -> engine ->
//! assembler flow against the in-process vector index and deterministic
//! embedder, plus the degraded paths with failing backends.

use maternal_rag::content::{trimester_for_week, ContentStore, ContentStoreConfig};
use maternal_rag::error::{Result, ServiceError};
use maternal_rag::patient::backend::ProfileBackend;
use maternal_rag::patient::{
    mock_profile, PatientContextProvider, PatientProfile, ProfileSource, Severity,
};
use maternal_rag::personalization::generation::{GenerationError, TextGenerator};
use maternal_rag::personalization::{
    risk_level_for, PersonalizationEngine, PersonalizationStatus, RiskLevel, AI_CONFIDENCE,
    DEGRADED_CONFIDENCE, FALLBACK_CONFIDENCE,
};
use maternal_rag::pipeline::{PersonalizationRequest, PersonalizedContentService};
use maternal_rag::vector::{HashEmbedder, InMemoryVectorBackend};
use std::collections::HashSet;
use std::sync::Arc;

struct FailingGenerator;

#[async_trait::async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(
        &self,
        _prompt: &str,
        _max_tokens: usize,
    ) -> std::result::Result<String, GenerationError> {
        Err(GenerationError::NetworkError("forced failure".to_string()))
    }
}

struct JsonGenerator;

#[async_trait::async_trait]
impl TextGenerator for JsonGenerator {
    async fn complete(
        &self,
        _prompt: &str,
        _max_tokens: usize,
    ) -> std::result::Result<String, GenerationError> {
        Ok(r#"{
            "personalized_note": "AI tailored note",
            "medical_consideration": "AI consideration",
            "risk_level": "low",
            "monitoring_recommendations": ["AI follow-up"]
        }"#
        .to_string())
    }
}

struct DownProfileBackend;

#[async_trait::async_trait]
impl ProfileBackend for DownProfileBackend {
    async fn fetch_profile(&self, patient_id: &str) -> Result<PatientProfile> {
        Err(ServiceError::ProfileUnavailable(format!(
            "no backend for {}",
            patient_id
        )))
    }
}

async fn build_store() -> Arc<ContentStore> {
    Arc::new(
        ContentStore::new(
            ContentStoreConfig::default(),
            Arc::new(InMemoryVectorBackend::new()),
            Arc::new(HashEmbedder::new(128)),
        )
        .await,
    )
}

async fn build_service(generator: Arc<dyn TextGenerator>) -> PersonalizedContentService {
    let store = build_store().await;
    let patients = Arc::new(PatientContextProvider::new(Arc::new(DownProfileBackend)));
    let engine = Arc::new(PersonalizationEngine::new(generator, 500));
    PersonalizedContentService::new(store, patients, engine)
}

#[tokio::test]
async fn test_trimester_partition_holds_for_all_weeks() {
    let store = build_store().await;
    for week in 1..=40u32 {
        let record = store.get_week(week).unwrap();
        assert_eq!(record.trimester, trimester_for_week(week as u8));
        let expected = match week {
            1..=13 => 1,
            14..=27 => 2,
            _ => 3,
        };
        assert_eq!(record.trimester as u32, expected);
    }
}

#[tokio::test]
async fn test_week_lookup_out_of_range_is_not_found() {
    let store = build_store().await;
    for week in [0u32, 41, 99] {
        assert!(matches!(store.get_week(week), Err(ServiceError::NotFound(_))));
    }
}

#[tokio::test]
async fn test_semantic_search_is_idempotent() {
    let store = build_store().await;
    let query = "week 15 pregnancy developments symptoms";

    let first = store.semantic_search(query, 5).await.unwrap();
    let second = store.semantic_search(query, 5).await.unwrap();

    let first_order: Vec<u8> = first.iter().map(|(r, _)| r.week).collect();
    let second_order: Vec<u8> = second.iter().map(|(r, _)| r.week).collect();
    assert_eq!(first_order, second_order);

    for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_mock_profiles_are_deterministic_and_total() {
    let diabetic = mock_profile("PAT_DIABETES_1");
    assert!(diabetic
        .conditions
        .iter()
        .any(|c| c.name.to_lowercase().contains("diabetes")));

    let healthy = mock_profile("PAT123");
    assert!(healthy.conditions.is_empty());

    // Same id, same profile, every time.
    for _ in 0..3 {
        let again = mock_profile("PAT_DIABETES_1");
        assert_eq!(again.conditions.len(), diabetic.conditions.len());
        assert_eq!(again.conditions[0].name, diabetic.conditions[0].name);
    }
}

#[test]
fn test_risk_policy_is_pure_function_of_profile() {
    let mut profile = mock_profile("PAT_HYPERTENSION_1");
    profile.conditions[0].severity = Severity::Severe;
    assert_eq!(risk_level_for(&profile), RiskLevel::High);
    // Unchanged by repeated evaluation.
    assert_eq!(risk_level_for(&profile), RiskLevel::High);
}

#[tokio::test]
async fn test_development_count_matches_base_record() {
    let service = build_service(Arc::new(FailingGenerator)).await;
    let store = build_store().await;

    for week in [1u32, 15, 28, 40] {
        let base = store.get_week(week).unwrap().clone();
        let result = service
            .personalized_week(PersonalizationRequest {
                week,
                patient_id: "PAT_DIABETES_1".to_string(),
                use_ai: true,
                profile_source: ProfileSource::Mock,
            })
            .await
            .unwrap();

        assert_ne!(result.status, PersonalizationStatus::Degraded);
        assert_eq!(
            result.personalized_developments.len(),
            base.key_developments.len()
        );
    }
}

#[tokio::test]
async fn test_advisories_and_monitoring_have_no_duplicates() {
    let service = build_service(Arc::new(FailingGenerator)).await;
    let result = service
        .personalized_week(PersonalizationRequest {
            week: 20,
            patient_id: "PAT_DIABETES_1".to_string(),
            use_ai: false,
            profile_source: ProfileSource::Mock,
        })
        .await
        .unwrap();

    let advisories: HashSet<&String> = result.medical_advisories.iter().collect();
    assert_eq!(advisories.len(), result.medical_advisories.len());

    let monitoring: HashSet<&String> = result.special_monitoring.iter().collect();
    assert_eq!(monitoring.len(), result.special_monitoring.len());
    assert!(!result.special_monitoring.is_empty());
}

#[tokio::test]
async fn test_end_to_end_diabetic_week_15_rule_based() {
    let service = build_service(Arc::new(FailingGenerator)).await;
    let result = service
        .personalized_week(PersonalizationRequest {
            week: 15,
            patient_id: "PAT_DIABETES_123".to_string(),
            use_ai: false,
            profile_source: ProfileSource::Mock,
        })
        .await
        .unwrap();

    assert_eq!(result.trimester, 2);
    assert!(result
        .special_monitoring
        .iter()
        .any(|m| m.to_lowercase().contains("glucose")));
    for dev in &result.personalized_developments {
        assert!(dev.risk_level == RiskLevel::Medium || dev.risk_level == RiskLevel::High);
        assert!(dev
            .monitoring_recommendations
            .iter()
            .any(|m| m.to_lowercase().contains("glucose")));
    }
    assert!(!result.rag_context.is_empty());
}

#[tokio::test]
async fn test_end_to_end_week_41_is_not_found() {
    let service = build_service(Arc::new(FailingGenerator)).await;
    let err = service
        .personalized_week(PersonalizationRequest {
            week: 41,
            patient_id: "PAT_DIABETES_123".to_string(),
            use_ai: false,
            profile_source: ProfileSource::Mock,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_generation_failure_degrades_to_rule_based_success() {
    let service = build_service(Arc::new(FailingGenerator)).await;
    let result = service
        .personalized_week(PersonalizationRequest {
            week: 22,
            patient_id: "PAT_HYPERTENSION_5".to_string(),
            use_ai: true,
            profile_source: ProfileSource::Mock,
        })
        .await
        .unwrap();

    // Request succeeds with the fallback confidence and substantive notes.
    assert_eq!(result.status, PersonalizationStatus::RuleBased);
    assert_eq!(result.confidence_score, FALLBACK_CONFIDENCE);
    for dev in &result.personalized_developments {
        assert!(!dev.personalized_note.is_empty());
    }
}

#[tokio::test]
async fn test_ai_path_reports_high_confidence_and_policy_risk() {
    let service = build_service(Arc::new(JsonGenerator)).await;
    let result = service
        .personalized_week(PersonalizationRequest {
            week: 30,
            patient_id: "PAT_CANCER_9".to_string(),
            use_ai: true,
            profile_source: ProfileSource::Mock,
        })
        .await
        .unwrap();

    assert_eq!(result.status, PersonalizationStatus::Ai);
    assert_eq!(result.confidence_score, AI_CONFIDENCE);
    for dev in &result.personalized_developments {
        assert_eq!(dev.personalized_note, "AI tailored note");
        // Oncology history pins risk high regardless of model output.
        assert_eq!(dev.risk_level, RiskLevel::High);
    }
}

#[tokio::test]
async fn test_backend_profile_unavailable_yields_degraded_result() {
    let service = build_service(Arc::new(JsonGenerator)).await;
    let result = service
        .personalized_week(PersonalizationRequest {
            week: 15,
            patient_id: "PAT_DIABETES_123".to_string(),
            use_ai: true,
            profile_source: ProfileSource::Backend,
        })
        .await
        .unwrap();

    assert_eq!(result.status, PersonalizationStatus::Degraded);
    assert!(result.personalized_developments.is_empty());
    assert_eq!(result.confidence_score, DEGRADED_CONFIDENCE);
    assert!(result.warning.is_some());
    // Base content stays reachable alongside the degraded result.
    assert_eq!(result.week, 15);
    assert_eq!(result.trimester, 2);
}
