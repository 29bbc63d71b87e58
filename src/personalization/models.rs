//! Personalization result models

use crate::content::KeyDevelopment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk classification for a pregnancy given the patient profile.
/// Derived by a pure policy function of the profile, never by AI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// How the response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalizationStatus {
    /// Every development note came from the text-generation backend.
    Ai,
    /// At least one development used the rule-based templates.
    RuleBased,
    /// Personalization was skipped entirely; base content only.
    Degraded,
}

impl PersonalizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalizationStatus::Ai => "ai",
            PersonalizationStatus::RuleBased => "rule_based",
            PersonalizationStatus::Degraded => "degraded",
        }
    }
}

/// One key development annotated for a specific patient. Created fresh
/// per request and owned by the enclosing result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedDevelopment {
    pub original_development: KeyDevelopment,
    pub personalized_note: String,
    pub medical_consideration: String,
    pub risk_level: RiskLevel,
    pub monitoring_recommendations: Vec<String>,
}

/// Raw engine output before assembly: one entry per key development plus
/// the per-item generation contexts and outcome counters.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub developments: Vec<PersonalizedDevelopment>,
    pub contexts: Vec<String>,
    pub ai_generated: usize,
    pub fallback_count: usize,
}

impl EngineOutput {
    pub fn status(&self) -> PersonalizationStatus {
        if self.fallback_count == 0 && self.ai_generated > 0 {
            PersonalizationStatus::Ai
        } else {
            PersonalizationStatus::RuleBased
        }
    }
}

/// Final response aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizationResult {
    pub patient_id: String,
    pub week: u8,
    pub trimester: u8,
    pub personalized_developments: Vec<PersonalizedDevelopment>,
    pub medical_advisories: Vec<String>,
    pub special_monitoring: Vec<String>,
    pub confidence_score: f32,
    pub rag_context: String,
    pub status: PersonalizationStatus,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
