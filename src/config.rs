//! # Pipeline Configuration Module
//!
//! This module defines the configuration passed into the corpus pipeline:
//! source locations, the classifier vocabulary, outlier bounds and the
//! sampling plan. Nothing here is process-global; tests build their own
//! configurations with synthetic paths and lists.

use std::env;
use std::path::PathBuf;

use crate::classifiers::RecipeType;
use crate::errors::{CorpusError, Result};
use crate::sources::SourceLocation;

// Canonical classifier patterns, evaluated in this order
pub const MAIN_COURSE_PATTERN: &str =
    "lunch|meal|meat|chicken|beef|pork|steak|turkey|duck|fish|salmon|lamb|crab|shrimp|lobster|tuna|vegetable|potato|rice|noodle|pasta|penne|spaghetti|macaroni|linguine|pizza|quiche|lentil|tofu|onion|soup|stew|dressing";
pub const BREAKFAST_PATTERN: &str = "breakfast";
pub const DESSERT_PATTERN: &str =
    "dessert|cake|cookie|brownie|muffin|biscuit|babka|sweet|candy|sugar|banana";
pub const BEVERAGES_PATTERN: &str = "beverage|cocktail|smoothie|lemonade|coffee";

/// Meat, poultry, fish, shellfish and cured-meat terms (substring match)
pub const NON_VEGETARIAN_TERMS: &[&str] = &[
    "meat", "chicken", "beef", "pork", "bacon", "ham", "steak", "scallop", "tilapia",
    "anchovy", "sausage", "lamb", "duck", "goose", "lobster", "shrimp", "prawn", "crab",
    "halibut", "cod", "squid", "octopus", "calamari", "oyster", "mussel", "clam", "snail",
    "seafood", "anchovies", "prosciutto", "salami", "pepperoni", "pancetta", "chorizo",
    "andouille", "pate", "haddock", "veal", "venison", "game", "poultry", "turkey", "bison",
    "boar", "fish", "tuna", "salmon",
];

/// World cuisines in priority order; the first one found among the keywords wins
pub const WORLD_CUISINES: &[&str] = &[
    "Asian", "Indian", "Chinese", "Thai", "Japanese", "Hawaiian", "Russian", "Korean",
    "French", "Vietnamese", "Indonesian", "Malaysian", "Pakistani", "Cantonese", "Nepalese",
    "Cambodian", "Mongolian", "Filipino", "Asia", "New Zealand", "Australian", "Lebanese",
    "Turkish", "Dutch", "Palestinian", "African", "Egyptian", "Nigerian", "Sudanese",
    "Ecuadorean", "Moroccan", "Ethiopian", "Somalian", "Mexican", "U.S.", "Caribbean",
    "American", "Cuban", "Venezuelan", "Peruvian", "Puerto Rican", "Colombian", "Chilean",
    "Costa Rican", "Spanish", "Guatemalan", "Honduran", "Brazilian", "European", "Greek",
    "German", "Portuguese", "Scottish", "Polish", "Austrian", "Hungarian", "Danish",
    "Finnish", "Belgian", "Norwegian", "Welsh", "Czech", "Scandinavian", "Icelandic",
];

pub const BEGINNER_TAG: &str = "Easy";

pub const DEFAULT_MAX_CALORIES: f64 = 1500.0;
pub const DEFAULT_MAX_SERVINGS: i64 = 72;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Term lists and patterns used by the classifiers
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Recipe type patterns in evaluation order
    pub type_patterns: Vec<(RecipeType, String)>,
    /// Denylist for the vegetarian flag
    pub non_vegetarian_terms: Vec<String>,
    /// Cuisine names in priority order
    pub cuisines: Vec<String>,
    /// Keyword marking beginner-friendly recipes
    pub beginner_tag: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            type_patterns: vec![
                (RecipeType::MainCourse, MAIN_COURSE_PATTERN.to_string()),
                (RecipeType::Breakfast, BREAKFAST_PATTERN.to_string()),
                (RecipeType::Dessert, DESSERT_PATTERN.to_string()),
                (RecipeType::Beverages, BEVERAGES_PATTERN.to_string()),
            ],
            non_vegetarian_terms: NON_VEGETARIAN_TERMS.iter().map(|t| t.to_string()).collect(),
            cuisines: WORLD_CUISINES.iter().map(|c| c.to_string()).collect(),
            beginner_tag: BEGINNER_TAG.to_string(),
        }
    }
}

/// Bounds outside which a nutrition record is not representative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    /// Inclusive upper bound; the lower bound is exclusive zero
    pub max_calories: f64,
    /// Inclusive upper bound on servings
    pub max_servings: i64,
}

impl Default for OutlierBounds {
    fn default() -> Self {
        Self {
            max_calories: DEFAULT_MAX_CALORIES,
            max_servings: DEFAULT_MAX_SERVINGS,
        }
    }
}

/// Per-bucket sample sizes and the seed that makes draws reproducible
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPlan {
    /// Buckets are drawn in this order
    pub targets: Vec<(RecipeType, usize)>,
    pub seed: u64,
}

impl SamplingPlan {
    /// Sum of the per-bucket targets
    pub fn total_target(&self) -> usize {
        self.targets.iter().map(|(_, target)| target).sum()
    }
}

impl Default for SamplingPlan {
    fn default() -> Self {
        Self {
            targets: vec![
                (RecipeType::Beverages, 1500),
                (RecipeType::Breakfast, 1300),
                (RecipeType::Dessert, 3200),
                (RecipeType::MainCourse, 4000),
            ],
            seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

/// Everything a pipeline run needs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub nutrition_source: SourceLocation,
    pub measurements_source: SourceLocation,
    pub output_path: PathBuf,
    pub vocabulary: Vocabulary,
    pub outliers: OutlierBounds,
    pub sampling: SamplingPlan,
    /// Drop cuisines seen this many times or fewer; `None` keeps all
    pub min_cuisine_support: Option<usize>,
}

impl PipelineConfig {
    /// Configuration with default vocabulary, bounds and sampling plan
    pub fn new(
        nutrition_source: impl Into<SourceLocation>,
        measurements_source: impl Into<SourceLocation>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            nutrition_source: nutrition_source.into(),
            measurements_source: measurements_source.into(),
            output_path: output_path.into(),
            vocabulary: Vocabulary::default(),
            outliers: OutlierBounds::default(),
            sampling: SamplingPlan::default(),
            min_cuisine_support: None,
        }
    }

    /// Read the configuration from the process environment
    ///
    /// Required: `RECIPE_NUTRITION_SOURCE`, `RECIPE_MEASUREMENTS_SOURCE`,
    /// `RECIPE_CORPUS_OUTPUT`. Optional: `RECIPE_SAMPLE_SEED`,
    /// `RECIPE_MIN_CUISINE_SUPPORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`PipelineConfig::from_env`], reading variables through `lookup`
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| CorpusError::Config(format!("{name} must be set")))
        };

        let mut config = Self::new(
            SourceLocation::parse(&required("RECIPE_NUTRITION_SOURCE")?),
            SourceLocation::parse(&required("RECIPE_MEASUREMENTS_SOURCE")?),
            required("RECIPE_CORPUS_OUTPUT")?,
        );

        if let Some(seed) = optional_number::<u64>(&lookup, "RECIPE_SAMPLE_SEED")? {
            config.sampling.seed = seed;
        }
        config.min_cuisine_support =
            optional_number::<usize>(&lookup, "RECIPE_MIN_CUISINE_SUPPORT")?;

        Ok(config)
    }
}

fn optional_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>> {
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CorpusError::Config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_default_sampling_plan() {
        let plan = SamplingPlan::default();
        assert_eq!(plan.total_target(), 10_000);
        assert_eq!(plan.seed, 42);
        assert_eq!(plan.targets[0], (RecipeType::Beverages, 1500));
        assert_eq!(plan.targets[3], (RecipeType::MainCourse, 4000));
    }

    #[test]
    fn test_cuisine_list_has_no_duplicates() {
        let unique: HashSet<_> = WORLD_CUISINES.iter().map(|c| c.to_lowercase()).collect();
        assert_eq!(unique.len(), WORLD_CUISINES.len());
        assert_eq!(WORLD_CUISINES[0], "Asian");
        assert_eq!(WORLD_CUISINES[1], "Indian");
    }

    #[test]
    fn test_denylist_is_lowercase() {
        assert!(NON_VEGETARIAN_TERMS.iter().all(|t| t.to_lowercase() == *t));
        assert!(NON_VEGETARIAN_TERMS.contains(&"scallop"));
        assert!(NON_VEGETARIAN_TERMS.contains(&"tilapia"));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("RECIPE_NUTRITION_SOURCE", "data/recipes.parquet"),
        ("RECIPE_MEASUREMENTS_SOURCE", "https://example.org/full_dataset.csv"),
        ("RECIPE_CORPUS_OUTPUT", "out/corpus.parquet"),
    ];

    #[test]
    fn test_from_vars_reads_required_and_optional() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RECIPE_SAMPLE_SEED", " 7 "));
        pairs.push(("RECIPE_MIN_CUISINE_SUPPORT", "15"));
        let config = PipelineConfig::from_vars(vars(&pairs)).unwrap();

        assert!(matches!(config.nutrition_source, SourceLocation::Local(_)));
        assert!(matches!(config.measurements_source, SourceLocation::Remote(_)));
        assert_eq!(config.output_path, PathBuf::from("out/corpus.parquet"));
        assert_eq!(config.sampling.seed, 7);
        assert_eq!(config.min_cuisine_support, Some(15));
    }

    #[test]
    fn test_from_vars_defaults_optional_values() {
        let config = PipelineConfig::from_vars(vars(&REQUIRED)).unwrap();
        assert_eq!(config.sampling.seed, DEFAULT_SAMPLE_SEED);
        assert_eq!(config.min_cuisine_support, None);
    }

    #[test]
    fn test_missing_required_variable_is_config_error() {
        let err = PipelineConfig::from_vars(vars(&REQUIRED[..2])).unwrap_err();
        match err {
            CorpusError::Config(message) => assert!(message.contains("RECIPE_CORPUS_OUTPUT")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_seed_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RECIPE_SAMPLE_SEED", "forty-two"));
        let err = PipelineConfig::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, CorpusError::Config(_)));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RECIPE_MIN_CUISINE_SUPPORT", "-3"));
        assert!(PipelineConfig::from_vars(vars(&pairs)).is_err());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config =
            PipelineConfig::new("nutrition.parquet", "measurements.csv", "out/corpus.parquet");
        assert_eq!(config.outliers, OutlierBounds::default());
        assert_eq!(config.sampling, SamplingPlan::default());
        assert_eq!(config.vocabulary, Vocabulary::default());
        assert_eq!(config.min_cuisine_support, None);
        assert_eq!(config.output_path, PathBuf::from("out/corpus.parquet"));
    }
}
