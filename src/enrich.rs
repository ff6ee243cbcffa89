//! # Recipe Enricher Module
//!
//! Derives the filter columns the search UI relies on and drops records that
//! cannot be filtered.
//!
//! ## Features
//!
//! - Title de-duplication (first occurrence wins)
//! - Duration minutes, readable durations and the duration category
//! - Recipe type, with `Other` records removed
//! - Beginner, vegetarian and world cuisine flags
//! - Singularized ingredient entities and `#`-prefixed keywords
//! - Optional removal of rarely seen cuisines

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::classifiers::{RecipeClassifier, RecipeType};
use crate::duration::{categorize_duration, duration_to_minutes, duration_to_readable};
use crate::models::{EnrichedRecipe, MergedRecipe};
use crate::singularize::to_singular;

/// Enrich with the canonical vocabulary and no cuisine support threshold
pub fn enrich(merged: Vec<MergedRecipe>) -> Vec<EnrichedRecipe> {
    enrich_with(merged, RecipeClassifier::canonical(), None)
}

/// Enrich merged recipes with an explicit classifier
///
/// When `min_cuisine_support` is `Some(n)`, recipes whose cuisine occurs `n`
/// times or fewer in the enriched set are removed as well.
pub fn enrich_with(
    merged: Vec<MergedRecipe>,
    classifier: &RecipeClassifier,
    min_cuisine_support: Option<usize>,
) -> Vec<EnrichedRecipe> {
    let input_count = merged.len();

    let mut titles = HashSet::new();
    let unique: Vec<MergedRecipe> = merged
        .into_iter()
        .filter(|recipe| titles.insert(recipe.title.clone()))
        .collect();
    let unique_count = unique.len();

    let mut untimed = 0usize;
    let mut unclassified = 0usize;
    let mut enriched = Vec::with_capacity(unique_count);
    for recipe in unique {
        let total_minutes = duration_to_minutes(&recipe.total_time);
        if total_minutes == 0 {
            untimed += 1;
            continue;
        }

        let recipe_type =
            classifier.recipe_type(Some(&recipe.category), &recipe.keywords, &recipe.title);
        if recipe_type == RecipeType::Other {
            unclassified += 1;
            continue;
        }

        enriched.push(enrich_record(recipe, classifier, total_minutes, recipe_type));
    }

    debug!(
        duplicate_titles = input_count - unique_count,
        untimed,
        unclassified,
        "Merged recipes removed"
    );

    let enriched = match min_cuisine_support {
        Some(threshold) => drop_rare_cuisines(enriched, threshold),
        None => enriched,
    };

    info!(recipes = enriched.len(), "Recipes enriched");
    enriched
}

fn enrich_record(
    recipe: MergedRecipe,
    classifier: &RecipeClassifier,
    total_minutes: u32,
    recipe_type: RecipeType,
) -> EnrichedRecipe {
    let beginner_friendly = classifier.is_beginner_friendly(&recipe.keywords);
    let vegetarian_friendly = !classifier.is_non_vegetarian(&recipe.ner);
    let world_cuisine = classifier.world_cuisine(&recipe.keywords);

    EnrichedRecipe {
        cook_minutes: duration_to_minutes(&recipe.cook_time),
        prep_minutes: duration_to_minutes(&recipe.prep_time),
        total_minutes,
        total_time_category: categorize_duration(total_minutes),
        cook_time: duration_to_readable(&recipe.cook_time),
        prep_time: duration_to_readable(&recipe.prep_time),
        total_time: duration_to_readable(&recipe.total_time),
        ner: to_singular(&recipe.ner),
        keywords: recipe.keywords.iter().map(|k| format!("#{k}")).collect(),
        recipe_type,
        beginner_friendly,
        vegetarian_friendly,
        world_cuisine,
        title: recipe.title,
        author: recipe.author,
        description: recipe.description,
        image: recipe.image,
        category: recipe.category,
        rating: recipe.rating,
        review_count: recipe.review_count,
        calories: recipe.calories,
        fat: recipe.fat,
        protein: recipe.protein,
        servings: recipe.servings,
        ingredients: recipe.ingredients,
        directions: recipe.directions,
        link: recipe.link,
    }
}

/// Drop recipes whose cuisine occurs `threshold` times or fewer
pub fn drop_rare_cuisines(recipes: Vec<EnrichedRecipe>, threshold: usize) -> Vec<EnrichedRecipe> {
    let mut support: HashMap<String, usize> = HashMap::new();
    for recipe in &recipes {
        *support.entry(recipe.world_cuisine.clone()).or_default() += 1;
    }

    let before = recipes.len();
    let kept: Vec<EnrichedRecipe> = recipes
        .into_iter()
        .filter(|recipe| support.get(&recipe.world_cuisine).copied().unwrap_or(0) > threshold)
        .collect();
    debug!(threshold, removed = before - kept.len(), "Rare cuisines removed");
    kept
}
