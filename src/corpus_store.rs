//! # Corpus Store Module
//!
//! Persistence of the sampled corpus as a single columnar file.
//!
//! ## Features
//!
//! - Write-once output: rows are encoded into a temporary file next to the
//!   target and renamed into place only after the encoder finished
//! - A failed write leaves nothing at the output path
//! - Read-back into [`EnrichedRecipe`] values for the search layer
//!
//! Row position in the file is the recipe identifier.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListBuilder, StringArray, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;
use tracing::info;

use crate::classifiers::RecipeType;
use crate::columns::{
    string_item_field, string_list_type, BoolColumn, FloatColumn, IntColumn, ListColumn, TextColumn,
};
use crate::duration::DurationCategory;
use crate::errors::{CorpusError, Result};
use crate::models::EnrichedRecipe;

/// Output column names, in file order
pub const CORPUS_COLUMNS: [&str; 27] = [
    "title",
    "AuthorName",
    "Description",
    "Images",
    "RecipeCategory",
    "Keywords",
    "AggregatedRating",
    "ReviewCount",
    "Calories",
    "FatContent",
    "ProteinContent",
    "RecipeServings",
    "ingredients",
    "directions",
    "link",
    "NER",
    "CookTime",
    "PrepTime",
    "TotalTime",
    "CookTime_minutes",
    "PrepTime_minutes",
    "TotalTime_minutes",
    "TotalTime_cat",
    "RecipeType",
    "Beginner_Friendly",
    "Vegetarian_Friendly",
    "World_Cuisine",
];

fn column_type(name: &str) -> DataType {
    match name {
        "Keywords" | "ingredients" | "directions" | "NER" => string_list_type(),
        "AggregatedRating" | "Calories" | "FatContent" | "ProteinContent" => DataType::Float64,
        "ReviewCount" | "RecipeServings" | "CookTime_minutes" | "PrepTime_minutes"
        | "TotalTime_minutes" => DataType::Int64,
        "Beginner_Friendly" | "Vegetarian_Friendly" => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

/// Schema of the corpus file
pub fn corpus_schema() -> SchemaRef {
    let fields: Vec<Field> = CORPUS_COLUMNS
        .iter()
        .map(|name| Field::new(*name, column_type(name), false))
        .collect();
    Arc::new(Schema::new(fields))
}

fn text<'a>(
    recipes: &'a [EnrichedRecipe],
    value: impl Fn(&'a EnrichedRecipe) -> &'a str,
) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(recipes.iter().map(value)))
}

fn float(recipes: &[EnrichedRecipe], value: impl Fn(&EnrichedRecipe) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(recipes.iter().map(value)))
}

fn int(recipes: &[EnrichedRecipe], value: impl Fn(&EnrichedRecipe) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(recipes.iter().map(value)))
}

fn flag(recipes: &[EnrichedRecipe], value: impl Fn(&EnrichedRecipe) -> bool) -> ArrayRef {
    Arc::new(BooleanArray::from(recipes.iter().map(value).collect::<Vec<bool>>()))
}

fn list<'a>(
    recipes: &'a [EnrichedRecipe],
    value: impl Fn(&'a EnrichedRecipe) -> &'a [String],
) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new()).with_field(string_item_field());
    for recipe in recipes {
        for item in value(recipe) {
            builder.values().append_value(item);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

/// Assemble the corpus into one record batch
pub fn to_record_batch(recipes: &[EnrichedRecipe]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        text(recipes, |r| r.title.as_str()),
        text(recipes, |r| r.author.as_str()),
        text(recipes, |r| r.description.as_str()),
        text(recipes, |r| r.image.as_str()),
        text(recipes, |r| r.category.as_str()),
        list(recipes, |r| r.keywords.as_slice()),
        float(recipes, |r| r.rating),
        int(recipes, |r| r.review_count),
        float(recipes, |r| r.calories),
        float(recipes, |r| r.fat),
        float(recipes, |r| r.protein),
        int(recipes, |r| r.servings),
        list(recipes, |r| r.ingredients.as_slice()),
        list(recipes, |r| r.directions.as_slice()),
        text(recipes, |r| r.link.as_str()),
        list(recipes, |r| r.ner.as_slice()),
        text(recipes, |r| r.cook_time.as_str()),
        text(recipes, |r| r.prep_time.as_str()),
        text(recipes, |r| r.total_time.as_str()),
        int(recipes, |r| i64::from(r.cook_minutes)),
        int(recipes, |r| i64::from(r.prep_minutes)),
        int(recipes, |r| i64::from(r.total_minutes)),
        text(recipes, |r| r.total_time_category.as_str()),
        text(recipes, |r| r.recipe_type.as_str()),
        flag(recipes, |r| r.beginner_friendly),
        flag(recipes, |r| r.vegetarian_friendly),
        text(recipes, |r| r.world_cuisine.as_str()),
    ];
    Ok(RecordBatch::try_new(corpus_schema(), columns)?)
}

/// Write the corpus atomically to `path`
///
/// The parent directory is created if needed. Nothing appears at `path`
/// unless the whole file was encoded and flushed.
pub fn write_corpus(path: &Path, recipes: &[EnrichedRecipe]) -> Result<()> {
    let batch = to_record_batch(recipes)?;

    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let write_error = |source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    };
    let encode_error = |source| CorpusError::Encode {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(parent).map_err(write_error)?;
    let mut staged = NamedTempFile::new_in(parent).map_err(write_error)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(staged.as_file_mut(), batch.schema(), Some(props))
        .map_err(encode_error)?;
    writer.write(&batch).map_err(encode_error)?;
    writer.close().map_err(encode_error)?;

    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(path).map_err(|e| write_error(e.error))?;

    info!(path = %path.display(), rows = recipes.len(), "Corpus written");
    Ok(())
}

/// Column readers for one corpus record batch
struct CorpusColumns {
    title: TextColumn,
    author: TextColumn,
    description: TextColumn,
    image: TextColumn,
    category: TextColumn,
    keywords: ListColumn,
    rating: FloatColumn,
    review_count: IntColumn,
    calories: FloatColumn,
    fat: FloatColumn,
    protein: FloatColumn,
    servings: IntColumn,
    ingredients: ListColumn,
    directions: ListColumn,
    link: TextColumn,
    ner: ListColumn,
    cook_time: TextColumn,
    prep_time: TextColumn,
    total_time: TextColumn,
    cook_minutes: IntColumn,
    prep_minutes: IntColumn,
    total_minutes: IntColumn,
    total_time_category: TextColumn,
    recipe_type: TextColumn,
    beginner_friendly: BoolColumn,
    vegetarian_friendly: BoolColumn,
    world_cuisine: TextColumn,
}

impl CorpusColumns {
    fn read(batch: &RecordBatch, location: &str) -> Result<Self> {
        Ok(Self {
            title: TextColumn::read(batch, "title", location)?,
            author: TextColumn::read(batch, "AuthorName", location)?,
            description: TextColumn::read(batch, "Description", location)?,
            image: TextColumn::read(batch, "Images", location)?,
            category: TextColumn::read(batch, "RecipeCategory", location)?,
            keywords: ListColumn::read(batch, "Keywords", location)?,
            rating: FloatColumn::read(batch, "AggregatedRating", location)?,
            review_count: IntColumn::read(batch, "ReviewCount", location)?,
            calories: FloatColumn::read(batch, "Calories", location)?,
            fat: FloatColumn::read(batch, "FatContent", location)?,
            protein: FloatColumn::read(batch, "ProteinContent", location)?,
            servings: IntColumn::read(batch, "RecipeServings", location)?,
            ingredients: ListColumn::read(batch, "ingredients", location)?,
            directions: ListColumn::read(batch, "directions", location)?,
            link: TextColumn::read(batch, "link", location)?,
            ner: ListColumn::read(batch, "NER", location)?,
            cook_time: TextColumn::read(batch, "CookTime", location)?,
            prep_time: TextColumn::read(batch, "PrepTime", location)?,
            total_time: TextColumn::read(batch, "TotalTime", location)?,
            cook_minutes: IntColumn::read(batch, "CookTime_minutes", location)?,
            prep_minutes: IntColumn::read(batch, "PrepTime_minutes", location)?,
            total_minutes: IntColumn::read(batch, "TotalTime_minutes", location)?,
            total_time_category: TextColumn::read(batch, "TotalTime_cat", location)?,
            recipe_type: TextColumn::read(batch, "RecipeType", location)?,
            beginner_friendly: BoolColumn::read(batch, "Beginner_Friendly", location)?,
            vegetarian_friendly: BoolColumn::read(batch, "Vegetarian_Friendly", location)?,
            world_cuisine: TextColumn::read(batch, "World_Cuisine", location)?,
        })
    }

    fn recipe(&self, row: usize, location: &str) -> Result<EnrichedRecipe> {
        let invalid = |column: &str| CorpusError::InvalidValue {
            location: location.to_string(),
            column: column.to_string(),
            row,
        };
        let minutes = |column: &IntColumn, name: &str| {
            column
                .get(row)
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| invalid(name))
        };

        Ok(EnrichedRecipe {
            title: self.title.get(row).ok_or_else(|| invalid("title"))?,
            author: self.author.get(row).ok_or_else(|| invalid("AuthorName"))?,
            description: self.description.get(row).ok_or_else(|| invalid("Description"))?,
            image: self.image.get(row).ok_or_else(|| invalid("Images"))?,
            category: self.category.get(row).ok_or_else(|| invalid("RecipeCategory"))?,
            keywords: self.keywords.get(row).ok_or_else(|| invalid("Keywords"))?,
            rating: self.rating.get(row).ok_or_else(|| invalid("AggregatedRating"))?,
            review_count: self.review_count.get(row).ok_or_else(|| invalid("ReviewCount"))?,
            calories: self.calories.get(row).ok_or_else(|| invalid("Calories"))?,
            fat: self.fat.get(row).ok_or_else(|| invalid("FatContent"))?,
            protein: self.protein.get(row).ok_or_else(|| invalid("ProteinContent"))?,
            servings: self.servings.get(row).ok_or_else(|| invalid("RecipeServings"))?,
            ingredients: self.ingredients.get(row).ok_or_else(|| invalid("ingredients"))?,
            directions: self.directions.get(row).ok_or_else(|| invalid("directions"))?,
            link: self.link.get(row).ok_or_else(|| invalid("link"))?,
            ner: self.ner.get(row).ok_or_else(|| invalid("NER"))?,
            cook_time: self.cook_time.get(row).ok_or_else(|| invalid("CookTime"))?,
            prep_time: self.prep_time.get(row).ok_or_else(|| invalid("PrepTime"))?,
            total_time: self.total_time.get(row).ok_or_else(|| invalid("TotalTime"))?,
            cook_minutes: minutes(&self.cook_minutes, "CookTime_minutes")?,
            prep_minutes: minutes(&self.prep_minutes, "PrepTime_minutes")?,
            total_minutes: minutes(&self.total_minutes, "TotalTime_minutes")?,
            total_time_category: self
                .total_time_category
                .get(row)
                .and_then(|label| DurationCategory::from_label(&label))
                .ok_or_else(|| invalid("TotalTime_cat"))?,
            recipe_type: self
                .recipe_type
                .get(row)
                .and_then(|label| RecipeType::from_label(&label))
                .ok_or_else(|| invalid("RecipeType"))?,
            beginner_friendly: self
                .beginner_friendly
                .get(row)
                .ok_or_else(|| invalid("Beginner_Friendly"))?,
            vegetarian_friendly: self
                .vegetarian_friendly
                .get(row)
                .ok_or_else(|| invalid("Vegetarian_Friendly"))?,
            world_cuisine: self.world_cuisine.get(row).ok_or_else(|| invalid("World_Cuisine"))?,
        })
    }
}

/// Read a persisted corpus back, in file order
pub fn load_corpus(path: &Path) -> Result<Vec<EnrichedRecipe>> {
    let location = path.display().to_string();
    let parquet_error = |source| CorpusError::Parquet {
        location: location.clone(),
        source,
    };

    let file = File::open(path).map_err(|source| CorpusError::SourceIo {
        location: location.clone(),
        source,
    })?;
    let batches = ParquetRecordBatchReaderBuilder::try_new(file)
        .and_then(|builder| builder.build())
        .map_err(parquet_error)?;

    let mut recipes = Vec::new();
    for batch in batches {
        let batch = batch.map_err(|e| parquet_error(ParquetError::ArrowError(e.to_string())))?;
        let columns = CorpusColumns::read(&batch, &location)?;
        for row in 0..batch.num_rows() {
            recipes.push(columns.recipe(row, &location)?);
        }
    }

    info!(path = %location, rows = recipes.len(), "Corpus loaded");
    Ok(recipes)
}
