//! # Pipeline Integration Tests
//!
//! End-to-end runs over generated nutrition (Parquet) and measurements (CSV)
//! fixtures.

mod common;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use recipe_corpus::classifiers::RecipeType;
use recipe_corpus::config::SamplingPlan;
use recipe_corpus::corpus_store::load_corpus;
use recipe_corpus::duration::DurationCategory;
use recipe_corpus::{build_corpus, ensure_corpus, CorpusError, CorpusPipeline, PipelineConfig};
use tempfile::{tempdir, TempDir};

use common::{
    measurement, nutrition, scenario_measurements, scenario_nutrition, write_measurements,
    write_nutrition,
};

struct Scenario {
    dir: TempDir,
    nutrition: PathBuf,
    measurements: PathBuf,
}

impl Scenario {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let nutrition = dir.path().join("recipes.parquet");
        let measurements = dir.path().join("full_dataset.csv");
        write_nutrition(&nutrition, &scenario_nutrition());
        write_measurements(&measurements, &scenario_measurements());
        Self {
            dir,
            nutrition,
            measurements,
        }
    }

    fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join("out").join(name)
    }

    fn config(&self, output: &Path) -> PipelineConfig {
        PipelineConfig::new(self.nutrition.as_path(), self.measurements.as_path(), output)
    }
}

#[test]
fn test_end_to_end_row_counts() {
    let scenario = Scenario::new();
    let output = scenario.output("corpus.parquet");

    let report = build_corpus(
        scenario.nutrition.as_path(),
        scenario.measurements.as_path(),
        output.clone(),
    )
    .unwrap();

    // duplicate curry and the calorie outlier are removed at load
    assert_eq!(report.nutrition_records, 7);
    // only titles present on the nutrition side are decoded; one pancake row has broken NER
    assert_eq!(report.measurement_records, 5);
    assert_eq!(report.merged, 6);
    // second lemon tart and the unclassifiable dish are removed
    assert_eq!(report.enriched, 4);
    assert!(!report.sampled);
    assert_eq!(report.written, 4);
    assert_eq!(report.output, output);
}

#[test]
fn test_end_to_end_corpus_content() {
    let scenario = Scenario::new();
    let output = scenario.output("corpus.parquet");
    CorpusPipeline::new(scenario.config(&output)).run().unwrap();

    let corpus = load_corpus(&output).unwrap();
    let titles: Vec<&str> = corpus.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Lemon Tart", "Chicken Curry", "Berry Smoothie", "Pancakes"]
    );

    let unique: HashSet<&str> = titles.iter().copied().collect();
    assert_eq!(unique.len(), titles.len());
    for recipe in &corpus {
        assert_ne!(recipe.recipe_type, RecipeType::Other);
        assert!(recipe.total_minutes > 0);
        assert!(recipe.keywords.iter().all(|k| k.starts_with('#')));
    }

    let tart = &corpus[0];
    assert_eq!(tart.author, "Ann");
    assert_eq!(tart.recipe_type, RecipeType::Dessert);
    assert_eq!(tart.world_cuisine, "French");
    assert!(tart.beginner_friendly);
    assert!(tart.vegetarian_friendly);
    assert_eq!(tart.ner, vec!["lemon", "egg", "sugar"]);
    assert_eq!(tart.directions, vec!["Zest the lemons.", "Bake the tart."]);
    assert_eq!(tart.image, "https://img.example/lemon-tart.jpg");
    assert_eq!(tart.total_time, "1 h");
    assert_eq!(tart.total_time_category, DurationCategory::UnderHour);

    let curry = &corpus[1];
    assert_eq!(curry.recipe_type, RecipeType::MainCourse);
    assert!(!curry.vegetarian_friendly);
    assert_eq!(curry.world_cuisine, "Indian");
    assert_eq!(curry.ner, vec!["chicken thigh", "onion"]);
    assert_eq!(curry.calories, 350.0);

    let smoothie = &corpus[2];
    assert_eq!(smoothie.recipe_type, RecipeType::Beverages);
    assert_eq!(smoothie.cook_time, "0 min");
    assert_eq!(smoothie.cook_minutes, 0);
    assert_eq!(smoothie.total_minutes, 5);
    assert_eq!(smoothie.world_cuisine, "Unknown");

    let pancakes = &corpus[3];
    assert_eq!(pancakes.recipe_type, RecipeType::Breakfast);
    assert_eq!(pancakes.ner, vec!["egg", "flour"]);
    assert_eq!(pancakes.servings, 4);
}

#[test]
fn test_identical_runs_produce_identical_files() {
    let scenario = Scenario::new();
    let first = scenario.output("first.parquet");
    let second = scenario.output("second.parquet");

    CorpusPipeline::new(scenario.config(&first)).run().unwrap();
    CorpusPipeline::new(scenario.config(&second)).run().unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_sampling_plan_bounds_output() {
    let scenario = Scenario::new();
    let output = scenario.output("sampled.parquet");
    let mut config = scenario.config(&output);
    config.sampling = SamplingPlan {
        targets: vec![
            (RecipeType::Beverages, 0),
            (RecipeType::Breakfast, 1),
            (RecipeType::Dessert, 1),
            (RecipeType::MainCourse, 0),
        ],
        seed: 42,
    };

    let report = CorpusPipeline::new(config).run().unwrap();
    assert_eq!(report.enriched, 4);
    assert!(report.sampled);
    assert_eq!(report.written, 2);

    let corpus = load_corpus(&output).unwrap();
    let types: HashSet<RecipeType> = corpus.iter().map(|r| r.recipe_type).collect();
    let expected: HashSet<RecipeType> = [RecipeType::Breakfast, RecipeType::Dessert]
        .into_iter()
        .collect();
    assert_eq!(types, expected);
}

#[test]
fn test_missing_source_writes_nothing() {
    let scenario = Scenario::new();
    let output = scenario.output("corpus.parquet");
    let config = PipelineConfig::new(
        scenario.dir.path().join("absent.parquet"),
        scenario.measurements.as_path(),
        output.as_path(),
    );

    let err = CorpusPipeline::new(config).run().unwrap_err();
    assert!(err.is_source_error());
    assert!(!output.exists());
}

#[test]
fn test_empty_join_is_fatal_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let nutrition_path = dir.path().join("recipes.parquet");
    let measurements_path = dir.path().join("full_dataset.csv");
    let output = dir.path().join("corpus.parquet");

    write_nutrition(
        &nutrition_path,
        &[nutrition("Lemon Tart", "Ann", "Tarts", &["Dessert"], "PT1H", &["Zest the lemons"])],
    );
    write_measurements(
        &measurements_path,
        &[measurement("Lemon Tart", &["Juice the lemons."], &["lemons"])],
    );

    let err = build_corpus(nutrition_path.as_path(), measurements_path.as_path(), output.clone())
        .unwrap_err();
    assert!(matches!(err, CorpusError::EmptyJoin { .. }));
    assert!(!output.exists());
}

#[test]
fn test_ensure_corpus_builds_once_then_reuses() {
    let scenario = Scenario::new();
    let output = scenario.output("corpus.parquet");
    let config = scenario.config(&output);

    let report = ensure_corpus(&config).unwrap().expect("first call builds the corpus");
    assert_eq!(report.written, 4);
    let built = fs::read(&output).unwrap();

    assert!(ensure_corpus(&config).unwrap().is_none());
    assert_eq!(fs::read(&output).unwrap(), built);
}

#[test]
fn test_ensure_corpus_failure_is_actionable() {
    let scenario = Scenario::new();
    let output = scenario.output("corpus.parquet");
    let mut config = scenario.config(&output);
    config.measurements_source = scenario.dir.path().join("absent.csv").into();

    let err = ensure_corpus(&config).unwrap_err();
    assert_eq!(err.to_string(), "dataset initialization failed");
    assert!(err.downcast_ref::<CorpusError>().is_some());
    assert!(!output.exists());
}
