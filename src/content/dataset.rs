//! Embedded 40-week reference dataset

use super::models::{trimester_for_week, PregnancyWeekRecord, MAX_WEEK, MIN_WEEK};
use crate::error::{Result, ServiceError};
use once_cell::sync::Lazy;

static RAW_DATASET: &str = include_str!("../../data/pregnancy_weeks.json");

static DATASET: Lazy<Vec<PregnancyWeekRecord>> =
    Lazy::new(|| load().expect("embedded pregnancy dataset is malformed"));

/// The full reference dataset, parsed once per process.
pub fn reference_weeks() -> &'static [PregnancyWeekRecord] {
    &DATASET
}

/// Parse and validate the embedded dataset. Trimester values are derived
/// from the week number, and the dataset must cover weeks 1-40 exactly
/// once each.
pub fn load() -> Result<Vec<PregnancyWeekRecord>> {
    let mut records: Vec<PregnancyWeekRecord> = serde_json::from_str(RAW_DATASET)
        .map_err(|e| ServiceError::Internal(format!("failed to parse dataset: {}", e)))?;

    for record in &mut records {
        if record.week < MIN_WEEK || record.week > MAX_WEEK {
            return Err(ServiceError::Internal(format!(
                "dataset contains out-of-range week {}",
                record.week
            )));
        }
        record.trimester = trimester_for_week(record.week);
    }

    records.sort_by_key(|r| r.week);

    let expected = (MAX_WEEK - MIN_WEEK + 1) as usize;
    if records.len() != expected {
        return Err(ServiceError::Internal(format!(
            "dataset has {} weeks, expected {}",
            records.len(),
            expected
        )));
    }

    for (idx, record) in records.iter().enumerate() {
        if record.week as usize != idx + 1 {
            return Err(ServiceError::Internal(format!(
                "dataset week {} is missing or duplicated",
                idx + 1
            )));
        }
    }

    Ok(records)
}
