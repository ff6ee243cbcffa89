//! # Recipe Data Model
//!
//! Typed records flowing through the pipeline. Raw records are produced by the
//! source loaders after normalization; merged and enriched records are rebuilt
//! in full on every run.
//!
//! ## Core Concepts
//!
//! - **RawNutritionRecord**: one recipe from the nutrition source
//! - **RawMeasurementRecord**: one recipe from the measurements source
//! - **MergedRecipe**: the fingerprint join of the two
//! - **EnrichedRecipe**: a merged recipe with the derived filter columns

use serde::{Deserialize, Serialize};

use crate::classifiers::RecipeType;
use crate::duration::DurationCategory;

/// One recipe from the nutrition source, after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNutritionRecord {
    pub name: String,
    pub author: String,
    pub cook_time: String,
    pub prep_time: String,
    pub total_time: String,
    pub description: String,
    /// First element of the published image list
    pub image: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub ingredient_quantities: Vec<String>,
    pub ingredient_parts: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub calories: f64,
    pub fat: f64,
    pub protein: f64,
    pub servings: i64,
    /// Cleaned steps, one sentence each
    pub instructions: Vec<String>,
}

impl RawNutritionRecord {
    /// First instruction step, half of the join fingerprint
    pub fn first_step(&self) -> Option<&str> {
        self.instructions.first().map(String::as_str)
    }
}

/// One recipe from the measurements source, after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurementRecord {
    pub title: String,
    /// Ingredient display lines ("1 c. sugar")
    pub ingredients: Vec<String>,
    /// Cleaned steps, one sentence each
    pub directions: Vec<String>,
    pub link: String,
    /// Normalized ingredient entities
    pub ner: Vec<String>,
}

impl RawMeasurementRecord {
    /// First direction step, half of the join fingerprint
    pub fn first_step(&self) -> Option<&str> {
        self.directions.first().map(String::as_str)
    }
}

/// A nutrition record joined with its measurement counterpart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecipe {
    pub title: String,
    pub author: String,
    pub cook_time: String,
    pub prep_time: String,
    pub total_time: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub calories: f64,
    pub fat: f64,
    pub protein: f64,
    pub servings: i64,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
    pub link: String,
    pub ner: Vec<String>,
}

impl MergedRecipe {
    /// Combine the two sides; the measurement directions become canonical
    pub fn join(nutrition: &RawNutritionRecord, measurement: &RawMeasurementRecord) -> Self {
        Self {
            title: measurement.title.clone(),
            author: nutrition.author.clone(),
            cook_time: nutrition.cook_time.clone(),
            prep_time: nutrition.prep_time.clone(),
            total_time: nutrition.total_time.clone(),
            description: nutrition.description.clone(),
            image: nutrition.image.clone(),
            category: nutrition.category.clone(),
            keywords: nutrition.keywords.clone(),
            rating: nutrition.rating,
            review_count: nutrition.review_count,
            calories: nutrition.calories,
            fat: nutrition.fat,
            protein: nutrition.protein,
            servings: nutrition.servings,
            ingredients: measurement.ingredients.clone(),
            directions: measurement.directions.clone(),
            link: measurement.link.clone(),
            ner: measurement.ner.clone(),
        }
    }
}

/// A merged recipe with the columns the search UI filters on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecipe {
    pub title: String,
    #[serde(rename = "AuthorName")]
    pub author: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Images")]
    pub image: String,
    #[serde(rename = "RecipeCategory")]
    pub category: String,
    /// Tags rendered as `#Tag`
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    #[serde(rename = "AggregatedRating")]
    pub rating: f64,
    #[serde(rename = "ReviewCount")]
    pub review_count: i64,
    #[serde(rename = "Calories")]
    pub calories: f64,
    #[serde(rename = "FatContent")]
    pub fat: f64,
    #[serde(rename = "ProteinContent")]
    pub protein: f64,
    #[serde(rename = "RecipeServings")]
    pub servings: i64,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
    pub link: String,
    /// Singularized ingredient entities
    #[serde(rename = "NER")]
    pub ner: Vec<String>,
    /// Readable durations ("1 h 30 min")
    #[serde(rename = "CookTime")]
    pub cook_time: String,
    #[serde(rename = "PrepTime")]
    pub prep_time: String,
    #[serde(rename = "TotalTime")]
    pub total_time: String,
    #[serde(rename = "CookTime_minutes")]
    pub cook_minutes: u32,
    #[serde(rename = "PrepTime_minutes")]
    pub prep_minutes: u32,
    #[serde(rename = "TotalTime_minutes")]
    pub total_minutes: u32,
    #[serde(rename = "TotalTime_cat")]
    pub total_time_category: DurationCategory,
    #[serde(rename = "RecipeType")]
    pub recipe_type: RecipeType,
    #[serde(rename = "Beginner_Friendly")]
    pub beginner_friendly: bool,
    #[serde(rename = "Vegetarian_Friendly")]
    pub vegetarian_friendly: bool,
    #[serde(rename = "World_Cuisine")]
    pub world_cuisine: String,
}

impl EnrichedRecipe {
    /// Whether the cuisine of origin was identified
    pub fn has_known_cuisine(&self) -> bool {
        self.world_cuisine != crate::classifiers::UNKNOWN_CUISINE
    }
}
