//! Deterministic mock profiles
//!
//! Substring markers in the patient id select one of a closed set of
//! canned profiles. The mapping is pure and total: every id resolves to
//! exactly one variant, unknown ids to the healthy profile, so tests and
//! demo environments are fully reproducible.

use super::models::{Condition, ConditionCategory, Demographics, PatientProfile, Severity};

/// The closed set of canned profile variants. Matching precedence is the
/// declaration order of [`MockProfileKind::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProfileKind {
    Diabetes,
    Hypertension,
    Oncology,
    Healthy,
}

impl MockProfileKind {
    /// Select the variant for a patient id. First marker wins.
    pub fn classify(patient_id: &str) -> Self {
        let id = patient_id.to_lowercase();
        if id.contains("diabetes") {
            MockProfileKind::Diabetes
        } else if id.contains("hypertension") {
            MockProfileKind::Hypertension
        } else if id.contains("cancer") || id.contains("oncology") {
            MockProfileKind::Oncology
        } else {
            MockProfileKind::Healthy
        }
    }

    /// Build the canned profile for this variant.
    pub fn build(&self, patient_id: &str) -> PatientProfile {
        let conditions = match self {
            MockProfileKind::Diabetes => vec![Condition {
                name: "Type 2 Diabetes".to_string(),
                category: ConditionCategory::Metabolic,
                severity: Severity::Moderate,
                treatment: vec!["Metformin".to_string(), "Diet management".to_string()],
            }],
            MockProfileKind::Hypertension => vec![Condition {
                name: "Hypertension".to_string(),
                category: ConditionCategory::Cardiovascular,
                severity: Severity::Mild,
                treatment: vec!["Lisinopril".to_string()],
            }],
            MockProfileKind::Oncology => vec![Condition {
                name: "Breast Cancer".to_string(),
                category: ConditionCategory::Oncology,
                severity: Severity::Moderate,
                treatment: vec![
                    "Chemotherapy".to_string(),
                    "Radiation therapy".to_string(),
                ],
            }],
            MockProfileKind::Healthy => vec![],
        };

        PatientProfile {
            patient_id: patient_id.to_string(),
            demographics: Demographics {
                age: 28,
                blood_type: "O+".to_string(),
            },
            conditions,
            medications: vec!["Prenatal vitamins".to_string()],
            allergies: vec![],
        }
    }
}

/// Resolve a patient id to its deterministic mock profile.
pub fn mock_profile(patient_id: &str) -> PatientProfile {
    MockProfileKind::classify(patient_id).build(patient_id)
}
