//! # Source Merger Module
//!
//! Joins the two cleaned sources on a recipe fingerprint: the nutrition name
//! must equal the measurement title and the first cleaned instruction must
//! equal the first cleaned direction. Recipes present in only one source are
//! excluded.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::errors::{CorpusError, Result};
use crate::models::{MergedRecipe, RawMeasurementRecord, RawNutritionRecord};

/// Inner join of the nutrition and measurement records
///
/// Output follows nutrition order, then measurement order within a key, and
/// is de-duplicated on `(title, author)` after the join. An empty result is
/// reported as [`CorpusError::EmptyJoin`].
pub fn merge(
    nutrition: &[RawNutritionRecord],
    measurements: &[RawMeasurementRecord],
) -> Result<Vec<MergedRecipe>> {
    let mut by_fingerprint: HashMap<(&str, &str), Vec<&RawMeasurementRecord>> = HashMap::new();
    for record in measurements {
        if let Some(step) = record.first_step() {
            by_fingerprint
                .entry((record.title.as_str(), step))
                .or_default()
                .push(record);
        }
    }

    let mut joined = 0usize;
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for record in nutrition {
        let Some(step) = record.first_step() else {
            continue;
        };
        let Some(matches) = by_fingerprint.get(&(record.name.as_str(), step)) else {
            continue;
        };
        for measurement in matches {
            joined += 1;
            if seen.insert((record.name.as_str(), record.author.as_str())) {
                merged.push(MergedRecipe::join(record, measurement));
            }
        }
    }

    debug!(joined, fan_out = joined - merged.len(), "Fingerprint join complete");

    if merged.is_empty() {
        return Err(CorpusError::EmptyJoin {
            nutrition: nutrition.len(),
            measurements: measurements.len(),
        });
    }

    info!(
        nutrition = nutrition.len(),
        measurements = measurements.len(),
        merged = merged.len(),
        "Sources merged"
    );
    Ok(merged)
}
