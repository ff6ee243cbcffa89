//! # Corpus Search Module
//!
//! In-memory filtering over a loaded corpus, the way the recipe finder uses
//! it. Filters are applied in sequence and every supplied filter must hold;
//! corpus order is preserved.
//!
//! ## Usage Example
//!
//! ```rust
//! use recipe_corpus::search::{clean_query, RecipeQuery};
//!
//! let query = RecipeQuery {
//!     ingredients: clean_query("Lemons, eggs!"),
//!     vegetarian: Some(true),
//!     ..RecipeQuery::default()
//! };
//! assert_eq!(query.ingredients, vec!["lemon", "egg"]);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifiers::RecipeType;
use crate::duration::DurationCategory;
use crate::models::EnrichedRecipe;
use crate::singularize::singular_noun;

/// Search criteria; `None` and empty lists leave a filter out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeQuery {
    /// Every entry must be one of the recipe's ingredient entities
    pub ingredients: Vec<String>,
    pub duration_category: Option<DurationCategory>,
    pub max_total_minutes: Option<u32>,
    pub recipe_type: Option<RecipeType>,
    pub vegetarian: Option<bool>,
    pub beginner: Option<bool>,
    /// The recipe's cuisine must be one of these
    pub cuisines: Vec<String>,
}

impl RecipeQuery {
    /// Query on the ingredients of a free-text search string
    pub fn from_text(raw: &str) -> Self {
        Self {
            ingredients: clean_query(raw),
            ..Self::default()
        }
    }

    /// Whether a recipe satisfies every supplied filter
    pub fn matches(&self, recipe: &EnrichedRecipe) -> bool {
        self.ingredients
            .iter()
            .all(|ingredient| recipe.ner.contains(ingredient))
            && self
                .duration_category
                .map_or(true, |category| recipe.total_time_category == category)
            && self
                .max_total_minutes
                .map_or(true, |max| recipe.total_minutes <= max)
            && self
                .recipe_type
                .map_or(true, |recipe_type| recipe.recipe_type == recipe_type)
            && self
                .vegetarian
                .map_or(true, |flag| recipe.vegetarian_friendly == flag)
            && self
                .beginner
                .map_or(true, |flag| recipe.beginner_friendly == flag)
            && (self.cuisines.is_empty() || self.cuisines.contains(&recipe.world_cuisine))
    }
}

/// Recipes matching `query`, in corpus order
pub fn search<'a>(corpus: &'a [EnrichedRecipe], query: &RecipeQuery) -> Vec<&'a EnrichedRecipe> {
    let results: Vec<&EnrichedRecipe> = corpus.iter().filter(|r| query.matches(r)).collect();
    debug!("Search matched {} of {} recipes", results.len(), corpus.len());
    results
}

/// Strip punctuation, lowercase and singularize each word of a query
///
/// ```rust
/// use recipe_corpus::search::clean_query;
///
/// assert_eq!(clean_query("Tomatoes; basil."), vec!["tomato", "basil"]);
/// assert!(clean_query("?!").is_empty());
/// ```
pub fn clean_query(raw: &str) -> Vec<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase();

    stripped
        .split_whitespace()
        .map(|word| singular_noun(word).unwrap_or_else(|| word.to_string()))
        .collect()
}
