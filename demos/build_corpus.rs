//! Build a corpus from two local or remote sources and run a sample search.
//!
//! ```text
//! cargo run --example build_corpus -- <nutrition.parquet> <measurements.csv> <corpus.parquet> [query]
//! ```

use std::env;

use anyhow::{bail, Result};
use recipe_corpus::classifiers::RecipeType;
use recipe_corpus::corpus_store::load_corpus;
use recipe_corpus::search::{clean_query, search, RecipeQuery};
use recipe_corpus::{ensure_corpus, PipelineConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: build_corpus <nutrition> <measurements> <output> [query]");
    }

    let config = PipelineConfig::new(args[0].as_str(), args[1].as_str(), args[2].as_str());
    if let Some(report) = ensure_corpus(&config)? {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let corpus = load_corpus(&config.output_path)?;
    let query = RecipeQuery {
        ingredients: clean_query(args.get(3).map(String::as_str).unwrap_or("eggs")),
        recipe_type: Some(RecipeType::Breakfast),
        ..RecipeQuery::default()
    };

    let results = search(&corpus, &query);
    println!("{} breakfast recipes with {:?}", results.len(), query.ingredients);
    for recipe in results.iter().take(10) {
        println!(
            "- {} ({}, {}, {})",
            recipe.title, recipe.total_time, recipe.world_cuisine, recipe.total_time_category
        );
    }

    Ok(())
}
