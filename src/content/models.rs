//! Data models for the pregnancy reference content

use serde::{Deserialize, Serialize};

pub const MIN_WEEK: u8 = 1;
pub const MAX_WEEK: u8 = 40;

/// Trimester partition: weeks 1-13 are trimester 1, 14-27 trimester 2,
/// 28-40 trimester 3. This is the single source of truth; stored dataset
/// values are never trusted for it.
pub fn trimester_for_week(week: u8) -> u8 {
    match week {
        0..=13 => 1,
        14..=27 => 2,
        _ => 3,
    }
}

/// Relatable baby size comparison for a given week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BabySize {
    pub name: String,
    pub weight: String,
    pub length: String,
}

/// A single fetal/maternal development milestone within a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDevelopment {
    pub title: String,
    pub description: String,
    pub category: String,
}

/// Static reference record for one pregnancy week.
///
/// Loaded once at startup from the embedded dataset and immutable
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyWeekRecord {
    pub week: u8,
    /// Derived from `week` at load time, see [`trimester_for_week`].
    #[serde(default)]
    pub trimester: u8,
    pub baby_size: BabySize,
    pub key_developments: Vec<KeyDevelopment>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub screening_tests: Vec<String>,
    #[serde(default)]
    pub wellness_tips: Vec<String>,
    #[serde(default)]
    pub nutrition_tips: Vec<String>,
}

impl PregnancyWeekRecord {
    /// Text representation of the record for embedding. Identical input
    /// records must produce identical text so index vectors stay stable
    /// across restarts.
    pub fn document_text(&self) -> String {
        let mut parts = vec![
            format!("Week {}", self.week),
            format!("Trimester {}", self.trimester),
            format!("Baby size: {}", self.baby_size.name),
        ];

        for dev in &self.key_developments {
            parts.push(format!("Development: {} - {}", dev.title, dev.description));
        }

        if !self.symptoms.is_empty() {
            parts.push(format!("Symptoms: {}", self.symptoms.join(", ")));
        }

        if !self.wellness_tips.is_empty() {
            parts.push(format!("Tips: {}", self.wellness_tips.join(", ")));
        }

        parts.join(" ")
    }
}
