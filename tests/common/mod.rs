//! Fixture writers shared by the integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// One row of the nutrition fixture
#[derive(Debug, Clone)]
pub struct NutritionFixture {
    pub name: &'static str,
    pub author: &'static str,
    pub cook_time: Option<&'static str>,
    pub prep_time: &'static str,
    pub total_time: &'static str,
    pub category: &'static str,
    pub keywords: Vec<&'static str>,
    pub calories: f64,
    pub servings: f64,
    pub instructions: Vec<&'static str>,
}

pub fn nutrition(
    name: &'static str,
    author: &'static str,
    category: &'static str,
    keywords: &[&'static str],
    total_time: &'static str,
    instructions: &[&'static str],
) -> NutritionFixture {
    NutritionFixture {
        name,
        author,
        cook_time: Some("PT10M"),
        prep_time: "PT10M",
        total_time,
        category,
        keywords: keywords.to_vec(),
        calories: 350.0,
        servings: 4.0,
        instructions: instructions.to_vec(),
    }
}

fn native_list(
    rows: &[NutritionFixture],
    value: impl Fn(&NutritionFixture) -> &[&'static str],
) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        for item in value(row) {
            builder.values().append_value(item);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn text(
    rows: &[NutritionFixture],
    value: impl Fn(&NutritionFixture) -> Option<String>,
) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(value).collect::<Vec<Option<String>>>()))
}

fn float(rows: &[NutritionFixture], value: impl Fn(&NutritionFixture) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(rows.iter().map(value).collect::<Vec<f64>>()))
}

/// Write the nutrition fixture as Parquet
///
/// `Keywords` and `RecipeInstructions` are native list columns, `Images` and
/// the ingredient columns are R-style encoded strings and `RecipeServings` is
/// a float column, as in the published dataset.
pub fn write_nutrition(path: &Path, rows: &[NutritionFixture]) {
    let list_type = DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)));
    let schema = Arc::new(Schema::new(vec![
        Field::new("RecipeId", DataType::Float64, true),
        Field::new("Name", DataType::Utf8, true),
        Field::new("AuthorName", DataType::Utf8, true),
        Field::new("CookTime", DataType::Utf8, true),
        Field::new("PrepTime", DataType::Utf8, true),
        Field::new("TotalTime", DataType::Utf8, true),
        Field::new("Description", DataType::Utf8, true),
        Field::new("Images", DataType::Utf8, true),
        Field::new("RecipeCategory", DataType::Utf8, true),
        Field::new("Keywords", list_type.clone(), true),
        Field::new("RecipeIngredientQuantities", DataType::Utf8, true),
        Field::new("RecipeIngredientParts", DataType::Utf8, true),
        Field::new("AggregatedRating", DataType::Float64, true),
        Field::new("ReviewCount", DataType::Float64, true),
        Field::new("Calories", DataType::Float64, true),
        Field::new("FatContent", DataType::Float64, true),
        Field::new("ProteinContent", DataType::Float64, true),
        Field::new("RecipeServings", DataType::Float64, true),
        Field::new("RecipeInstructions", list_type, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from((0..rows.len()).map(|i| i as f64).collect::<Vec<f64>>())),
        text(rows, |r| Some(r.name.to_string())),
        text(rows, |r| Some(r.author.to_string())),
        text(rows, |r| r.cook_time.map(str::to_string)),
        text(rows, |r| Some(r.prep_time.to_string())),
        text(rows, |r| Some(r.total_time.to_string())),
        text(rows, |r| Some(format!("All about {}.", r.name))),
        text(rows, |r| {
            let slug = r.name.to_lowercase().replace(' ', "-");
            Some(format!(
                r#"c("https://img.example/{slug}.jpg", "https://img.example/{slug}-2.jpg")"#
            ))
        }),
        text(rows, |r| Some(r.category.to_string())),
        native_list(rows, |r| r.keywords.as_slice()),
        text(rows, |_| Some(r#"c("1", "2")"#.to_string())),
        text(rows, |_| Some(r#"c("flour", "sugar")"#.to_string())),
        float(rows, |_| 4.5),
        float(rows, |_| 12.0),
        float(rows, |r| r.calories),
        float(rows, |_| 9.5),
        float(rows, |_| 6.0),
        float(rows, |r| r.servings),
        native_list(rows, |r| r.instructions.as_slice()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

/// One row of the measurements fixture; list columns hold raw encoded text
#[derive(Debug, Clone)]
pub struct MeasurementFixture {
    pub title: String,
    pub ingredients: String,
    pub directions: String,
    pub link: String,
    pub ner: String,
}

fn json<T: serde::Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap()
}

pub fn measurement(title: &str, directions: &[&str], ner: &[&str]) -> MeasurementFixture {
    MeasurementFixture {
        title: title.to_string(),
        ingredients: json(&ner.iter().map(|n| format!("1 c. {n}")).collect::<Vec<String>>()),
        directions: json(directions),
        link: format!("www.example.org/{}", title.to_lowercase().replace(' ', "-")),
        ner: json(ner),
    }
}

/// Write the measurements fixture as CSV with the published header layout
pub fn write_measurements(path: &Path, rows: &[MeasurementFixture]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer
        .write_record(["", "title", "ingredients", "directions", "link", "source", "NER"])
        .unwrap();
    for (i, row) in rows.iter().enumerate() {
        writer
            .write_record([
                i.to_string().as_str(),
                row.title.as_str(),
                row.ingredients.as_str(),
                row.directions.as_str(),
                row.link.as_str(),
                "Gathered",
                row.ner.as_str(),
            ])
            .unwrap();
    }
    writer.flush().unwrap();
}

/// Nutrition rows of the end-to-end scenario
pub fn scenario_nutrition() -> Vec<NutritionFixture> {
    let mut duplicate_curry = nutrition(
        "Chicken Curry",
        "Bob",
        "Curries",
        &["Indian", "Meat"],
        "PT45M",
        &["Brown the chicken. Simmer"],
    );
    duplicate_curry.calories = 900.0;

    let mut smoothie = nutrition(
        "Berry Smoothie",
        "Cy",
        "Smoothies",
        &["Easy"],
        "PT5M",
        &["Blend everything"],
    );
    smoothie.cook_time = None;
    smoothie.prep_time = "PT5M";

    let mut outlier = nutrition(
        "Outlier Cake",
        "Hal",
        "Cakes",
        &["Dessert"],
        "PT1H",
        &["Bake a lot"],
    );
    outlier.calories = 2000.0;

    vec![
        nutrition(
            "Lemon Tart",
            "Ann",
            "Tarts",
            &["Dessert", "Easy", "French"],
            "PT1H",
            &["Zest the lemons. Bake the tart"],
        ),
        nutrition(
            "Chicken Curry",
            "Bob",
            "Curries",
            &["Indian", "Meat"],
            "PT45M",
            &["Brown the chicken. Simmer"],
        ),
        duplicate_curry,
        smoothie,
        nutrition(
            "Pancakes",
            "Di",
            "Breakfast",
            &["Easy", "American"],
            "PT20M",
            &["Whisk the batter. Fry"],
        ),
        nutrition("Mystery Dish", "Ed", "Misc", &["Odd"], "PT30M", &["Combine"]),
        nutrition(
            "Lemon Tart",
            "Fay",
            "Pies",
            &["Dessert"],
            "PT50M",
            &["Zest the lemons. Bake the tart"],
        ),
        nutrition("Unmatched Stew", "Gus", "Stew", &["Meat"], "PT2H", &["Stew slowly"]),
        outlier,
    ]
}

/// Measurement rows of the end-to-end scenario
pub fn scenario_measurements() -> Vec<MeasurementFixture> {
    let mut broken_pancakes = measurement(
        "Pancakes",
        &["Whisk the batter. Fry"],
        &["eggs"],
    );
    broken_pancakes.ner = "[broken".to_string();

    vec![
        measurement(
            "Lemon Tart",
            &["Zest the lemons.", "Bake the tart."],
            &["lemons", "eggs", "sugar"],
        ),
        measurement(
            "Chicken Curry",
            &["Brown the chicken. Simmer."],
            &["chicken thighs", "onions"],
        ),
        measurement(
            "Berry Smoothie",
            &["Blend everything."],
            &["strawberries", "bananas"],
        ),
        broken_pancakes,
        measurement("Pancakes", &["Whisk the batter.", "Fry."], &["eggs", "flour"]),
        measurement("Mystery Dish", &["Combine."], &["stuff"]),
        measurement("Outlier Cake", &["Bake a lot."], &["butter"]),
        measurement("Plain Toast", &["Toast the bread."], &["bread"]),
    ]
}

/// A ready-made enriched recipe for sampler and search tests
pub fn enriched(
    title: &str,
    recipe_type: recipe_corpus::classifiers::RecipeType,
    cuisine: &str,
) -> recipe_corpus::EnrichedRecipe {
    use recipe_corpus::duration::DurationCategory;

    recipe_corpus::EnrichedRecipe {
        title: title.to_string(),
        author: "Ann".to_string(),
        description: format!("All about {title}."),
        image: "https://img.example/1.jpg".to_string(),
        category: "Misc".to_string(),
        keywords: vec![format!("#{cuisine}")],
        rating: 4.0,
        review_count: 3,
        calories: 250.0,
        fat: 8.0,
        protein: 6.0,
        servings: 2,
        ingredients: vec!["2 eggs".to_string()],
        directions: vec!["Cook.".to_string()],
        link: format!("www.example.org/{title}"),
        ner: vec!["egg".to_string()],
        cook_time: "10 min".to_string(),
        prep_time: "5 min".to_string(),
        total_time: "15 min".to_string(),
        cook_minutes: 10,
        prep_minutes: 5,
        total_minutes: 15,
        total_time_category: DurationCategory::UnderHalfHour,
        recipe_type,
        beginner_friendly: false,
        vegetarian_friendly: true,
        world_cuisine: cuisine.to_string(),
    }
}
