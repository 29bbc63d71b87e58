//! Response assembly
//!
//! Merges content-store output, engine output, and request parameters
//! into the final result. Aggregated advisory lists use set semantics
//! with first-occurrence order preserved.

use crate::content::PregnancyWeekRecord;
use crate::personalization::{
    EngineOutput, PersonalizationEngine, PersonalizationResult, PersonalizationStatus,
    DEGRADED_CONFIDENCE,
};
use indexmap::IndexSet;

/// Deduplicate while keeping the order entries first appeared in.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let set: IndexSet<String> = items.into_iter().collect();
    set.into_iter().collect()
}

/// Build the full result from a personalized engine run.
pub fn assemble(
    patient_id: &str,
    record: &PregnancyWeekRecord,
    output: EngineOutput,
) -> PersonalizationResult {
    let medical_advisories = dedup_preserving_order(
        output
            .developments
            .iter()
            .filter(|d| !d.medical_consideration.is_empty())
            .map(|d| d.medical_consideration.clone()),
    );

    let special_monitoring = dedup_preserving_order(
        output
            .developments
            .iter()
            .flat_map(|d| d.monitoring_recommendations.iter().cloned()),
    );

    let confidence_score = PersonalizationEngine::confidence(&output);
    let status = output.status();
    let rag_context = output.contexts.join("\n");

    PersonalizationResult {
        patient_id: patient_id.to_string(),
        week: record.week,
        trimester: record.trimester,
        personalized_developments: output.developments,
        medical_advisories,
        special_monitoring,
        confidence_score,
        rag_context,
        status,
        generated_at: chrono::Utc::now(),
        warning: None,
    }
}

/// Build a degraded result when personalization was skipped entirely:
/// base content remains retrievable, the annotated fields are empty, and
/// the status flag plus warning explain why.
pub fn assemble_degraded(
    patient_id: &str,
    record: &PregnancyWeekRecord,
    warning: impl Into<String>,
) -> PersonalizationResult {
    PersonalizationResult {
        patient_id: patient_id.to_string(),
        week: record.week,
        trimester: record.trimester,
        personalized_developments: Vec::new(),
        medical_advisories: Vec::new(),
        special_monitoring: Vec::new(),
        confidence_score: DEGRADED_CONFIDENCE,
        rag_context: String::new(),
        status: PersonalizationStatus::Degraded,
        generated_at: chrono::Utc::now(),
        warning: Some(warning.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::dataset;
    use crate::personalization::{PersonalizedDevelopment, RiskLevel, FALLBACK_CONFIDENCE};

    fn record() -> &'static PregnancyWeekRecord {
        &dataset::reference_weeks()[14]
    }

    fn personalized(consideration: &str, monitoring: &[&str]) -> PersonalizedDevelopment {
        PersonalizedDevelopment {
            original_development: record().key_developments[0].clone(),
            personalized_note: "note".to_string(),
            medical_consideration: consideration.to_string(),
            risk_level: RiskLevel::Medium,
            monitoring_recommendations: monitoring.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_dedup_preserves_first_occurrence() {
        let deduped = dedup_preserving_order(
            ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string()),
        );
        assert_eq!(deduped, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_assemble_deduplicates_across_developments() {
        let output = EngineOutput {
            developments: vec![
                personalized("Diabetes can affect fetal growth", &["Glucose checks", "Scan"]),
                personalized("Diabetes can affect fetal growth", &["Scan", "Diet review"]),
            ],
            contexts: vec!["ctx one".to_string(), "ctx two".to_string()],
            ai_generated: 0,
            fallback_count: 2,
        };

        let result = assemble("PAT1", record(), output);
        assert_eq!(result.medical_advisories.len(), 1);
        assert_eq!(
            result.special_monitoring,
            vec!["Glucose checks", "Scan", "Diet review"]
        );
        assert_eq!(result.confidence_score, FALLBACK_CONFIDENCE);
        assert_eq!(result.rag_context, "ctx one\nctx two");
        assert_eq!(result.trimester, 2);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_assemble_skips_empty_considerations() {
        let output = EngineOutput {
            developments: vec![personalized("", &[])],
            contexts: vec!["ctx".to_string()],
            ai_generated: 0,
            fallback_count: 1,
        };

        let result = assemble("PAT1", record(), output);
        assert!(result.medical_advisories.is_empty());
    }

    #[test]
    fn test_degraded_result_shape() {
        let result = assemble_degraded("PAT1", record(), "patient backend unreachable");
        assert_eq!(result.status, PersonalizationStatus::Degraded);
        assert!(result.personalized_developments.is_empty());
        assert_eq!(result.confidence_score, DEGRADED_CONFIDENCE);
        assert_eq!(result.week, 15);
        assert!(result.warning.is_some());
    }
}
