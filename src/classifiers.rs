//! # Category Classifiers Module
//!
//! Pattern-based taggers that derive the categorical and boolean columns the
//! search UI filters on.
//!
//! ## Features
//!
//! - Recipe type from category, keywords and title, in that order of trust
//! - Vegetarian flag from a meat/fish/shellfish denylist (substring match)
//! - World cuisine from an ordered cuisine list (exact keyword match, first entry wins)
//! - Beginner friendliness from the presence of a tag
//!
//! Tie-breaks are positional: the first source, pattern or cuisine entry that
//! matches decides the outcome.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Vocabulary;
use crate::errors::Result;

/// Label returned when no cuisine matches
pub const UNKNOWN_CUISINE: &str = "Unknown";

/// Course type assigned to a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecipeType {
    #[serde(rename = "Main Course")]
    MainCourse,
    Breakfast,
    Dessert,
    Beverages,
    Other,
}

impl RecipeType {
    /// Label stored in the corpus `RecipeType` column
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::MainCourse => "Main Course",
            RecipeType::Breakfast => "Breakfast",
            RecipeType::Dessert => "Dessert",
            RecipeType::Beverages => "Beverages",
            RecipeType::Other => "Other",
        }
    }

    /// Parse a stored label (or the `MainCourse` identifier) back into a type
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Main Course" | "MainCourse" => Some(RecipeType::MainCourse),
            "Breakfast" => Some(RecipeType::Breakfast),
            "Dessert" => Some(RecipeType::Dessert),
            "Beverages" => Some(RecipeType::Beverages),
            "Other" => Some(RecipeType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled classifier built from a [`Vocabulary`]
#[derive(Debug, Clone)]
pub struct RecipeClassifier {
    type_patterns: Vec<(RecipeType, Regex)>,
    non_vegetarian_terms: Vec<String>,
    /// (display name, lowercased name) in priority order
    cuisines: Vec<(String, String)>,
    beginner_tag: String,
}

lazy_static! {
    static ref DEFAULT_CLASSIFIER: RecipeClassifier = RecipeClassifier::new(&Vocabulary::default())
        .expect("Default classifier vocabulary should compile");
}

impl RecipeClassifier {
    /// Compile the patterns and normalize the term lists of a vocabulary
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let type_patterns = vocabulary
            .type_patterns
            .iter()
            .map(|(recipe_type, pattern)| Ok((*recipe_type, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Built classifier: {} type patterns, {} denylist terms, {} cuisines",
            type_patterns.len(),
            vocabulary.non_vegetarian_terms.len(),
            vocabulary.cuisines.len()
        );

        Ok(Self {
            type_patterns,
            non_vegetarian_terms: vocabulary
                .non_vegetarian_terms
                .iter()
                .map(|term| term.to_lowercase())
                .collect(),
            cuisines: vocabulary
                .cuisines
                .iter()
                .map(|cuisine| (cuisine.clone(), cuisine.to_lowercase()))
                .collect(),
            beginner_tag: vocabulary.beginner_tag.clone(),
        })
    }

    /// Shared classifier compiled from the canonical vocabulary
    pub fn canonical() -> &'static RecipeClassifier {
        &DEFAULT_CLASSIFIER
    }

    /// Assign a recipe type from category, keywords and title
    ///
    /// Each source is lowercased and tested against every pattern in order
    /// before moving on to the next source.
    pub fn recipe_type(
        &self,
        category: Option<&str>,
        keywords: &[String],
        title: &str,
    ) -> RecipeType {
        let joined_keywords = keywords.join(" ");
        let sources = [category, Some(joined_keywords.as_str()), Some(title)];

        for text in sources.into_iter().flatten() {
            let text = text.to_lowercase();
            for (recipe_type, pattern) in &self.type_patterns {
                if pattern.is_match(&text) {
                    return *recipe_type;
                }
            }
        }
        RecipeType::Other
    }

    /// Whether any ingredient contains a denylisted term
    pub fn is_non_vegetarian(&self, ingredients: &[String]) -> bool {
        ingredients.iter().any(|ingredient| {
            let ingredient = ingredient.to_lowercase();
            self.non_vegetarian_terms
                .iter()
                .any(|term| ingredient.contains(term.as_str()))
        })
    }

    /// First cuisine of the reference list that equals one of the keywords
    pub fn world_cuisine(&self, keywords: &[String]) -> String {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim_start_matches('#').trim().to_lowercase())
            .collect();

        self.cuisines
            .iter()
            .find(|(_, lower)| keywords.iter().any(|k| k == lower))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| UNKNOWN_CUISINE.to_string())
    }

    /// Whether the beginner tag is one of the keywords
    pub fn is_beginner_friendly(&self, keywords: &[String]) -> bool {
        keywords
            .iter()
            .any(|k| k.trim_start_matches('#') == self.beginner_tag)
    }
}

/// Assign a recipe type with the canonical vocabulary
///
/// # Examples
///
/// ```rust
/// use recipe_corpus::classifiers::{assign_recipe_type, RecipeType};
///
/// let keywords = vec!["Dessert".to_string(), "Lemon".to_string()];
/// assert_eq!(assign_recipe_type(Some("Tarts"), &keywords, "Lemon Tart"), RecipeType::Dessert);
/// ```
pub fn assign_recipe_type(category: Option<&str>, keywords: &[String], title: &str) -> RecipeType {
    RecipeClassifier::canonical().recipe_type(category, keywords, title)
}

/// Whether any ingredient contains a meat, poultry, fish or shellfish term
pub fn is_non_vegetarian(ingredients: &[String]) -> bool {
    RecipeClassifier::canonical().is_non_vegetarian(ingredients)
}

/// First matching cuisine of the canonical list, or `"Unknown"`
pub fn find_world_cuisine(keywords: &[String]) -> String {
    RecipeClassifier::canonical().world_cuisine(keywords)
}

/// Whether the keywords carry the `Easy` tag
pub fn is_beginner_friendly(keywords: &[String]) -> bool {
    RecipeClassifier::canonical().is_beginner_friendly(keywords)
}
