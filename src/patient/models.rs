//! Patient profile models

use serde::{Deserialize, Serialize};

/// Condition severity as recorded by the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Mild
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

/// Broad condition class used by the rule templates and the risk policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Metabolic,
    Cardiovascular,
    Oncology,
    Other,
}

impl Default for ConditionCategory {
    fn default() -> Self {
        ConditionCategory::Other
    }
}

/// A documented medical condition with its treatment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(default)]
    pub category: ConditionCategory,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub treatment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u32,
    pub blood_type: String,
}

/// Read-only medical context for personalization. Never mutated by this
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: String,
    pub demographics: Demographics,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl PatientProfile {
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}
