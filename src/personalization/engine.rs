//! Personalization engine
//!
//! Annotates each key development of a week for one patient. The AI path
//! asks the text-generation backend for a strict-JSON advisory; any
//! backend or parse failure drops that single item to the rule-based
//! templates while the rest of the request proceeds normally.

use super::generation::TextGenerator;
use super::models::{EngineOutput, PersonalizedDevelopment};
use super::{prompt, rules};
use crate::content::{KeyDevelopment, PregnancyWeekRecord};
use crate::metrics::METRICS;
use crate::patient::PatientProfile;
use std::sync::Arc;
use tracing::{debug, warn};

/// Confidence reported when every development note was AI-generated.
/// Empirically the generation path is treated as near-certain.
pub const AI_CONFIDENCE: f32 = 0.99;
/// Confidence reported when any item used the rule-based templates.
pub const FALLBACK_CONFIDENCE: f32 = 0.70;
/// Confidence reported when personalization was skipped entirely.
pub const DEGRADED_CONFIDENCE: f32 = 0.0;

pub struct PersonalizationEngine {
    generator: Arc<dyn TextGenerator>,
    max_tokens: usize,
}

impl PersonalizationEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: usize) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }

    /// Produce one personalized entry per key development.
    ///
    /// Infallible by construction: the rule-based path is pure, so the
    /// output always covers every development even when the generation
    /// backend is down.
    pub async fn personalize(
        &self,
        record: &PregnancyWeekRecord,
        profile: &PatientProfile,
        use_ai: bool,
    ) -> EngineOutput {
        let mut developments = Vec::with_capacity(record.key_developments.len());
        let mut contexts = Vec::with_capacity(record.key_developments.len());
        let mut ai_generated = 0;
        let mut fallback_count = 0;

        for dev in &record.key_developments {
            let context = prompt::development_context(dev, profile, record.week);

            let personalized = if use_ai {
                match self.generate(dev, profile, &context).await {
                    Some(personalized) => {
                        ai_generated += 1;
                        personalized
                    }
                    None => {
                        warn!(
                            "Generation failed for development '{}', using rule templates",
                            dev.title
                        );
                        METRICS.record_generation_fallback();
                        fallback_count += 1;
                        rules::rule_based_development(dev, profile)
                    }
                }
            } else {
                fallback_count += 1;
                rules::rule_based_development(dev, profile)
            };

            contexts.push(context);
            developments.push(personalized);
        }

        debug!(
            "Personalized week {} for {}: {} AI, {} rule-based",
            record.week, profile.patient_id, ai_generated, fallback_count
        );

        EngineOutput {
            developments,
            contexts,
            ai_generated,
            fallback_count,
        }
    }

    /// One AI generation attempt for one development. `None` routes the
    /// item to the rule templates.
    async fn generate(
        &self,
        dev: &KeyDevelopment,
        profile: &PatientProfile,
        context: &str,
    ) -> Option<PersonalizedDevelopment> {
        let request = prompt::generation_prompt(context);

        let raw = match self.generator.complete(&request, self.max_tokens).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Generation backend error: {}", e);
                return None;
            }
        };

        let advice = prompt::parse_generated(&raw)?;

        Some(PersonalizedDevelopment {
            original_development: dev.clone(),
            personalized_note: advice.personalized_note,
            medical_consideration: advice.medical_consideration,
            // The policy function owns risk; whatever the model claimed
            // is discarded.
            risk_level: rules::risk_level_for(profile),
            monitoring_recommendations: advice.monitoring_recommendations,
        })
    }

    /// Documented confidence rule: constant per generation path.
    pub fn confidence(output: &EngineOutput) -> f32 {
        if output.fallback_count == 0 && output.ai_generated > 0 {
            AI_CONFIDENCE
        } else {
            FALLBACK_CONFIDENCE
        }
    }
}
