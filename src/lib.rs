//! # Recipe Corpus
//!
//! Offline data preparation for a recipe finder: two raw recipe datasets are
//! cleaned, merged on a recipe fingerprint, enriched with filter columns and
//! down-sampled into one columnar corpus that the search layer reads.

pub mod classifiers;
pub mod columns;
pub mod config;
pub mod corpus_store;
pub mod duration;
pub mod enrich;
pub mod errors;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod sampler;
pub mod search;
pub mod singularize;
pub mod sources;

pub use config::PipelineConfig;
pub use errors::{CorpusError, Result};
pub use models::EnrichedRecipe;
pub use pipeline::{build_corpus, ensure_corpus, CorpusPipeline, CorpusReport};
