//! # Pipeline Driver Module
//!
//! Sequences load, merge, enrich, sample and persist. Every stage fully
//! materializes its output before the next one starts, and the output file is
//! written once at the very end, so a failed run never leaves a partial corpus.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use recipe_corpus::pipeline::build_corpus;
//!
//! let report = build_corpus(
//!     "data/recipes.parquet",
//!     "data/full_dataset.csv",
//!     "data/corpus.parquet",
//! )?;
//! println!("wrote {} recipes", report.written);
//! # Ok::<(), recipe_corpus::errors::CorpusError>(())
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::classifiers::RecipeClassifier;
use crate::config::PipelineConfig;
use crate::corpus_store::write_corpus;
use crate::enrich::enrich_with;
use crate::errors::Result;
use crate::merge::merge;
use crate::sampler::sample;
use crate::sources::{load_measurements_matching, load_nutrition_with, SourceLocation};

/// Row counts of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub output: PathBuf,
    pub nutrition_records: usize,
    pub measurement_records: usize,
    pub merged: usize,
    pub enriched: usize,
    /// Whether the enriched corpus exceeded the plan total and was down-sampled
    pub sampled: bool,
    pub written: usize,
}

/// A configured pipeline run
pub struct CorpusPipeline {
    config: PipelineConfig,
}

impl CorpusPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and write the corpus
    pub fn run(&self) -> Result<CorpusReport> {
        let config = &self.config;
        let started = Instant::now();
        info!(
            nutrition = %config.nutrition_source,
            measurements = %config.measurements_source,
            output = %config.output_path.display(),
            "Building recipe corpus"
        );

        let classifier = RecipeClassifier::new(&config.vocabulary)?;

        let nutrition = {
            let _stage = info_span!("pipeline", stage = "load_nutrition").entered();
            load_nutrition_with(&config.nutrition_source, &config.outliers)?
        };

        let measurements = {
            let _stage = info_span!("pipeline", stage = "load_measurements").entered();
            let titles: HashSet<String> = nutrition.iter().map(|r| r.name.clone()).collect();
            load_measurements_matching(&config.measurements_source, Some(&titles))?
        };

        let merged = {
            let _stage = info_span!("pipeline", stage = "merge").entered();
            merge(&nutrition, &measurements)?
        };
        let merged_count = merged.len();

        let enriched = {
            let _stage = info_span!("pipeline", stage = "enrich").entered();
            enrich_with(merged, &classifier, config.min_cuisine_support)
        };
        let enriched_count = enriched.len();

        let sampled = enriched_count > config.sampling.total_target();
        let corpus = {
            let _stage = info_span!("pipeline", stage = "sample").entered();
            sample(enriched, &config.sampling)
        };

        {
            let _stage = info_span!("pipeline", stage = "persist").entered();
            write_corpus(&config.output_path, &corpus)?;
        }

        let report = CorpusReport {
            output: config.output_path.clone(),
            nutrition_records: nutrition.len(),
            measurement_records: measurements.len(),
            merged: merged_count,
            enriched: enriched_count,
            sampled,
            written: corpus.len(),
        };
        info!(
            written = report.written,
            sampled = report.sampled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recipe corpus built"
        );
        Ok(report)
    }
}

/// Build a corpus with the default configuration
pub fn build_corpus(
    nutrition: impl Into<SourceLocation>,
    measurements: impl Into<SourceLocation>,
    output: impl Into<PathBuf>,
) -> Result<CorpusReport> {
    CorpusPipeline::new(PipelineConfig::new(nutrition, measurements, output)).run()
}

/// Make sure a corpus exists at the configured output path
///
/// An existing file is reused as-is and `None` is returned; otherwise the
/// corpus is built and its report returned.
pub fn ensure_corpus(config: &PipelineConfig) -> anyhow::Result<Option<CorpusReport>> {
    if config.output_path.is_file() {
        info!(output = %config.output_path.display(), "Reusing existing corpus");
        return Ok(None);
    }
    let report = CorpusPipeline::new(config.clone())
        .run()
        .context("dataset initialization failed")?;
    Ok(Some(report))
}
