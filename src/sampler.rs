//! # Stratified Sampler Module
//!
//! Deterministic down-sampling of the enriched corpus per recipe type.
//!
//! ## Features
//!
//! - Per-bucket targets clamped to the available population
//! - Recipes with a known cuisine are drawn before the rest of their bucket
//! - Portable seeded RNG: the same input and seed select and order the same rows
//!   on every platform

use std::time::Instant;

use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::SamplingPlan;
use crate::models::EnrichedRecipe;

/// Draw the bounded corpus described by `plan`
///
/// A corpus no larger than the plan total is returned unchanged. Otherwise
/// every bucket contributes `min(target, available)` recipes, known cuisines
/// first, and the concatenation is shuffled.
pub fn sample(recipes: Vec<EnrichedRecipe>, plan: &SamplingPlan) -> Vec<EnrichedRecipe> {
    let total_target = plan.total_target();
    if recipes.len() <= total_target {
        debug!(
            recipes = recipes.len(),
            total_target, "Corpus within target, sampling skipped"
        );
        return recipes;
    }

    let started = Instant::now();
    let mut selected: Vec<usize> = Vec::with_capacity(total_target);
    for (recipe_type, target) in &plan.targets {
        let (known, unknown): (Vec<usize>, Vec<usize>) = recipes
            .iter()
            .enumerate()
            .filter(|(_, recipe)| recipe.recipe_type == *recipe_type)
            .map(|(i, _)| i)
            .partition(|i| recipes[*i].has_known_cuisine());

        let clamped = (*target).min(known.len() + unknown.len());
        let from_known = clamped.min(known.len());
        let from_unknown = clamped - from_known;

        selected.extend(draw(&known, from_known, plan.seed));
        selected.extend(draw(&unknown, from_unknown, plan.seed));

        debug!(
            bucket = %recipe_type,
            available = known.len() + unknown.len(),
            known_cuisine = known.len(),
            drawn = clamped,
            "Bucket sampled"
        );
    }

    selected.shuffle(&mut ChaCha8Rng::seed_from_u64(plan.seed));

    let mut slots: Vec<Option<EnrichedRecipe>> = recipes.into_iter().map(Some).collect();
    let sampled: Vec<EnrichedRecipe> = selected
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect();

    info!(
        recipes = sampled.len(),
        seed = plan.seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Corpus sampled"
    );
    sampled
}

/// `amount` positions drawn uniformly without replacement, in draw order
fn draw(population: &[usize], amount: usize, seed: u64) -> Vec<usize> {
    if amount == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    index::sample(&mut rng, population.len(), amount)
        .into_iter()
        .map(|i| population[i])
        .collect()
}
