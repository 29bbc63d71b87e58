//! Personalization engine
//!
//! Combines a week record and a patient profile into annotated
//! developments: AI-generated notes with a strict parser when the
//! generation backend cooperates, condition-keyed rule templates when it
//! does not, and a risk policy that never depends on either.

pub mod engine;
pub mod generation;
pub mod models;
pub mod prompt;
pub mod rules;

pub use engine::{PersonalizationEngine, AI_CONFIDENCE, DEGRADED_CONFIDENCE, FALLBACK_CONFIDENCE};
pub use generation::{GenerationError, LlmGenerator, TextGenerator};
pub use models::{
    EngineOutput, PersonalizationResult, PersonalizationStatus, PersonalizedDevelopment, RiskLevel,
};
pub use rules::{risk_level_for, rule_based_development};
