//! Prompt construction and response parsing
//!
//! The generation backend is treated as untrusted and unstructured: the
//! prompt demands a strict JSON object, and anything that does not parse
//! cleanly sends the item down the deterministic rule-based path instead.

use crate::content::KeyDevelopment;
use crate::patient::PatientProfile;
use serde::Deserialize;

/// Natural-language context for one development and one patient,
/// returned in `rag_context` for observability.
pub fn development_context(dev: &KeyDevelopment, profile: &PatientProfile, week: u8) -> String {
    let mut parts = vec![format!(
        "Week {} development: {}. {}",
        week, dev.title, dev.description
    )];

    if profile.conditions.is_empty() {
        parts.push("Patient has no documented medical conditions.".to_string());
    } else {
        let conditions: Vec<String> = profile
            .conditions
            .iter()
            .map(|c| format!("{} ({} severity)", c.name, c.severity.as_str()))
            .collect();
        parts.push(format!("Patient conditions: {}.", conditions.join(", ")));
    }

    if !profile.medications.is_empty() {
        parts.push(format!(
            "Current medications: {}.",
            profile.medications.join(", ")
        ));
    }

    if !profile.allergies.is_empty() {
        parts.push(format!("Known allergies: {}.", profile.allergies.join(", ")));
    }

    parts.join(" ")
}

/// Fixed instruction template wrapped around a development context.
pub fn generation_prompt(context: &str) -> String {
    format!(
        "Personalize the following pregnancy development information for this patient.\n\
         \n\
         {}\n\
         \n\
         Respond with a JSON object containing exactly these keys:\n\
         - \"personalized_note\": the development description adapted to the patient's conditions\n\
         - \"medical_consideration\": one sentence on how the conditions interact with this development\n\
         - \"risk_level\": one of \"low\", \"medium\", \"high\"\n\
         - \"monitoring_recommendations\": a list of short monitoring actions\n\
         \n\
         Do not include any text outside the JSON object.",
        context
    )
}

/// Parsed generation output. `risk_level` is accepted for wire
/// compatibility but discarded by the engine in favor of the policy
/// function.
#[derive(Debug, Deserialize)]
pub struct GeneratedAdvice {
    pub personalized_note: String,
    #[serde(default)]
    pub medical_consideration: String,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub monitoring_recommendations: Vec<String>,
}

/// Strict parse of raw model output. Markdown code fences are stripped,
/// then the remainder must be a JSON object with a non-empty
/// `personalized_note`. Returns `None` on any deviation.
pub fn parse_generated(raw: &str) -> Option<GeneratedAdvice> {
    let cleaned = strip_code_fences(raw);
    let advice: GeneratedAdvice = serde_json::from_str(cleaned).ok()?;
    if advice.personalized_note.trim().is_empty() {
        return None;
    }
    Some(advice)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line ("```json" or bare "```") and the closing fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
