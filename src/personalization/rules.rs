//! Rule-based personalization templates and the risk policy
//!
//! The deterministic half of the engine: condition-keyed templates used
//! whenever AI generation is off or fails, and the risk policy that is
//! applied on every path.

use super::models::{PersonalizedDevelopment, RiskLevel};
use crate::content::KeyDevelopment;
use crate::patient::{ConditionCategory, PatientProfile, Severity};
use indexmap::IndexSet;

/// Canned advisory for one condition category.
pub struct RuleTemplate {
    pub note: &'static str,
    pub medical_consideration: &'static str,
    pub monitoring: &'static [&'static str],
}

const DIABETES_TEMPLATE: RuleTemplate = RuleTemplate {
    note: "Given your diabetes history, blood sugar control is crucial during this development phase.",
    medical_consideration: "Diabetes can affect fetal growth and development",
    monitoring: &[
        "Daily blood glucose monitoring",
        "Nutritionist consultation",
        "Endocrinologist review",
    ],
};

const HYPERTENSION_TEMPLATE: RuleTemplate = RuleTemplate {
    note: "Due to your blood pressure history, cardiovascular monitoring is important.",
    medical_consideration: "Hypertension increases risk of preeclampsia and other complications",
    monitoring: &[
        "Daily blood pressure monitoring",
        "Preeclampsia screening",
        "Cardiologist consultation",
    ],
};

const ONCOLOGY_TEMPLATE: RuleTemplate = RuleTemplate {
    note: "Your previous cancer treatment history requires special monitoring during pregnancy.",
    medical_consideration: "Previous cancer treatment may affect fetal development and pregnancy risks",
    monitoring: &[
        "Oncologist consultation",
        "Specialized blood work",
        "High-risk pregnancy monitoring",
    ],
};

const MEDICATION_REVIEW: RuleTemplate = RuleTemplate {
    note: "Current medications may need review during pregnancy.",
    medical_consideration: "Medication safety during pregnancy needs evaluation",
    monitoring: &["Medication review with healthcare provider"],
};

const ADVANCED_AGE: RuleTemplate = RuleTemplate {
    note: "Given your age, additional screening may be recommended.",
    medical_consideration: "Advanced maternal age increases certain pregnancy risks",
    monitoring: &["Genetic counseling", "Additional ultrasound monitoring"],
};

/// Age above which the advanced-maternal-age template applies.
const ADVANCED_AGE_THRESHOLD: u32 = 35;

/// Template for a condition category. Exhaustive over the closed
/// category set; `Other` intentionally has no canned advisory.
pub fn template_for(category: ConditionCategory) -> Option<&'static RuleTemplate> {
    match category {
        ConditionCategory::Metabolic => Some(&DIABETES_TEMPLATE),
        ConditionCategory::Cardiovascular => Some(&HYPERTENSION_TEMPLATE),
        ConditionCategory::Oncology => Some(&ONCOLOGY_TEMPLATE),
        ConditionCategory::Other => None,
    }
}

/// Risk policy: a pure function of the profile's conditions.
///
/// High when any condition is severe or oncology-related, medium when
/// any mild or moderate condition is present, low otherwise. Stable
/// across weeks, developments, and AI availability.
pub fn risk_level_for(profile: &PatientProfile) -> RiskLevel {
    let mut level = RiskLevel::Low;

    for condition in &profile.conditions {
        if condition.severity == Severity::Severe
            || condition.category == ConditionCategory::Oncology
        {
            return RiskLevel::High;
        }
        if matches!(condition.severity, Severity::Mild | Severity::Moderate) {
            level = RiskLevel::Medium;
        }
    }

    level
}

/// Build a personalized development from the rule templates alone.
pub fn rule_based_development(
    dev: &KeyDevelopment,
    profile: &PatientProfile,
) -> PersonalizedDevelopment {
    let mut note = dev.description.clone();
    let mut medical_consideration = String::new();
    let mut monitoring: IndexSet<String> = IndexSet::new();

    for condition in &profile.conditions {
        if let Some(template) = template_for(condition.category) {
            note.push(' ');
            note.push_str(template.note);
            medical_consideration = template.medical_consideration.to_string();
            monitoring.extend(template.monitoring.iter().map(|m| m.to_string()));
        }

        if !condition.treatment.is_empty() {
            note.push_str(&format!(
                " Current medications ({}) may need review during pregnancy.",
                condition.treatment.join(", ")
            ));
            medical_consideration = MEDICATION_REVIEW.medical_consideration.to_string();
            monitoring.extend(MEDICATION_REVIEW.monitoring.iter().map(|m| m.to_string()));
        }
    }

    if profile.demographics.age > ADVANCED_AGE_THRESHOLD {
        note.push(' ');
        note.push_str(ADVANCED_AGE.note);
        if medical_consideration.is_empty() {
            medical_consideration = ADVANCED_AGE.medical_consideration.to_string();
        }
        monitoring.extend(ADVANCED_AGE.monitoring.iter().map(|m| m.to_string()));
    }

    PersonalizedDevelopment {
        original_development: dev.clone(),
        personalized_note: note,
        medical_consideration,
        risk_level: risk_level_for(profile),
        monitoring_recommendations: monitoring.into_iter().collect(),
    }
}
