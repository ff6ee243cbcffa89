//! Loader for the columnar nutrition dataset.

use std::collections::HashSet;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use parquet::errors::ParquetError;
use parquet::file::reader::ChunkReader;
use tracing::{debug, info};

use crate::columns::{FloatColumn, IntColumn, ListColumn, TextColumn};
use crate::config::OutlierBounds;
use crate::duration::ZERO_DURATION;
use crate::errors::{CorpusError, Result};
use crate::models::RawNutritionRecord;
use crate::normalize::{clean_steps, is_representative, non_empty, required_text, whole_servings};
use crate::sources::{SourceData, SourceLocation};

/// Columns projected from the nutrition source
pub const NUTRITION_COLUMNS: [&str; 18] = [
    "Name",
    "AuthorName",
    "CookTime",
    "PrepTime",
    "TotalTime",
    "Description",
    "Images",
    "RecipeCategory",
    "Keywords",
    "RecipeIngredientQuantities",
    "RecipeIngredientParts",
    "AggregatedRating",
    "ReviewCount",
    "Calories",
    "FatContent",
    "ProteinContent",
    "RecipeServings",
    "RecipeInstructions",
];

/// A nutrition row as read, before the missing-value policy is applied
#[derive(Debug, Clone, Default)]
struct NutritionRow {
    name: Option<String>,
    author: Option<String>,
    cook_time: Option<String>,
    prep_time: Option<String>,
    total_time: Option<String>,
    description: Option<String>,
    images: Option<Vec<String>>,
    category: Option<String>,
    keywords: Option<Vec<String>>,
    quantities: Option<Vec<String>>,
    parts: Option<Vec<String>>,
    rating: Option<f64>,
    review_count: Option<i64>,
    calories: Option<f64>,
    fat: Option<f64>,
    protein: Option<f64>,
    servings: Option<f64>,
    instructions: Option<Vec<String>>,
}

impl NutritionRow {
    /// Apply list cleanup and the missing-value policy
    fn into_record(self) -> Option<RawNutritionRecord> {
        let image = non_empty(self.images?)?.into_iter().next()?;
        Some(RawNutritionRecord {
            name: required_text(self.name)?,
            author: required_text(self.author)?,
            cook_time: self.cook_time.unwrap_or_else(|| ZERO_DURATION.to_string()),
            prep_time: self.prep_time?,
            total_time: self.total_time?,
            description: self.description?,
            image,
            category: required_text(self.category)?,
            keywords: non_empty(self.keywords?)?,
            ingredient_quantities: non_empty(self.quantities?)?,
            ingredient_parts: non_empty(self.parts?)?,
            rating: self.rating?,
            review_count: self.review_count?,
            calories: self.calories?,
            fat: self.fat?,
            protein: self.protein?,
            servings: whole_servings(self.servings?)?,
            instructions: clean_steps(&self.instructions?)?,
        })
    }
}

/// Column readers for one record batch
struct NutritionColumns {
    name: TextColumn,
    author: TextColumn,
    cook_time: TextColumn,
    prep_time: TextColumn,
    total_time: TextColumn,
    description: TextColumn,
    images: ListColumn,
    category: TextColumn,
    keywords: ListColumn,
    quantities: ListColumn,
    parts: ListColumn,
    rating: FloatColumn,
    review_count: IntColumn,
    calories: FloatColumn,
    fat: FloatColumn,
    protein: FloatColumn,
    servings: FloatColumn,
    instructions: ListColumn,
}

impl NutritionColumns {
    fn read(batch: &RecordBatch, location: &str) -> Result<Self> {
        Ok(Self {
            name: TextColumn::read(batch, "Name", location)?,
            author: TextColumn::read(batch, "AuthorName", location)?,
            cook_time: TextColumn::read(batch, "CookTime", location)?,
            prep_time: TextColumn::read(batch, "PrepTime", location)?,
            total_time: TextColumn::read(batch, "TotalTime", location)?,
            description: TextColumn::read(batch, "Description", location)?,
            images: ListColumn::read(batch, "Images", location)?,
            category: TextColumn::read(batch, "RecipeCategory", location)?,
            keywords: ListColumn::read(batch, "Keywords", location)?,
            quantities: ListColumn::read(batch, "RecipeIngredientQuantities", location)?,
            parts: ListColumn::read(batch, "RecipeIngredientParts", location)?,
            rating: FloatColumn::read(batch, "AggregatedRating", location)?,
            review_count: IntColumn::read(batch, "ReviewCount", location)?,
            calories: FloatColumn::read(batch, "Calories", location)?,
            fat: FloatColumn::read(batch, "FatContent", location)?,
            protein: FloatColumn::read(batch, "ProteinContent", location)?,
            servings: FloatColumn::read(batch, "RecipeServings", location)?,
            instructions: ListColumn::read(batch, "RecipeInstructions", location)?,
        })
    }

    fn row(&self, i: usize) -> NutritionRow {
        NutritionRow {
            name: self.name.get(i),
            author: self.author.get(i),
            cook_time: self.cook_time.get(i),
            prep_time: self.prep_time.get(i),
            total_time: self.total_time.get(i),
            description: self.description.get(i),
            images: self.images.get(i),
            category: self.category.get(i),
            keywords: self.keywords.get(i),
            quantities: self.quantities.get(i),
            parts: self.parts.get(i),
            rating: self.rating.get(i),
            review_count: self.review_count.get(i),
            calories: self.calories.get(i),
            fat: self.fat.get(i),
            protein: self.protein.get(i),
            servings: self.servings.get(i),
            instructions: self.instructions.get(i),
        }
    }
}

fn decode_rows<T: ChunkReader + 'static>(reader: T, location: &str) -> Result<Vec<NutritionRow>> {
    let parquet_error = |source| CorpusError::Parquet {
        location: location.to_string(),
        source,
    };
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader).map_err(parquet_error)?;

    let mut roots = Vec::with_capacity(NUTRITION_COLUMNS.len());
    for column in NUTRITION_COLUMNS {
        let index = builder
            .schema()
            .index_of(column)
            .map_err(|_| CorpusError::MissingColumn {
                location: location.to_string(),
                column: column.to_string(),
            })?;
        roots.push(index);
    }
    let projection = ProjectionMask::roots(builder.parquet_schema(), roots);
    let batches = builder
        .with_projection(projection)
        .build()
        .map_err(parquet_error)?;

    let mut rows = Vec::new();
    for batch in batches {
        let batch = batch.map_err(|e| parquet_error(ParquetError::ArrowError(e.to_string())))?;
        let columns = NutritionColumns::read(&batch, location)?;
        rows.extend((0..batch.num_rows()).map(|i| columns.row(i)));
    }
    Ok(rows)
}

fn read_rows(location: &SourceLocation) -> Result<Vec<NutritionRow>> {
    let name = location.to_string();
    match location.open()? {
        SourceData::File(file) => decode_rows(file, &name),
        SourceData::Memory(bytes) => decode_rows(bytes, &name),
    }
}

/// Load the nutrition source with the default outlier bounds
pub fn load_nutrition(location: &SourceLocation) -> Result<Vec<RawNutritionRecord>> {
    load_nutrition_with(location, &OutlierBounds::default())
}

/// Load, de-duplicate, filter and normalize the nutrition source
///
/// Steps, in order: de-duplicate on `(Name, AuthorName)` keeping the first row,
/// reject calorie/serving outliers, then decode lists, keep the first image,
/// clean instructions, default a missing `CookTime` and drop rows that are
/// still incomplete. A fractional serving count counts as missing.
pub fn load_nutrition_with(
    location: &SourceLocation,
    bounds: &OutlierBounds,
) -> Result<Vec<RawNutritionRecord>> {
    let started = Instant::now();
    let rows = read_rows(location)?;
    let read_count = rows.len();
    info!(
        source = %location,
        rows = read_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Nutrition data set loaded"
    );

    let cleaning = Instant::now();
    let mut seen = HashSet::new();
    let unique: Vec<NutritionRow> = rows
        .into_iter()
        .filter(|row| seen.insert((row.name.clone(), row.author.clone())))
        .collect();
    let unique_count = unique.len();

    let representative: Vec<NutritionRow> = unique
        .into_iter()
        .filter(|row| is_representative(row.calories, row.servings, bounds))
        .collect();
    let representative_count = representative.len();

    let records: Vec<RawNutritionRecord> = representative
        .into_iter()
        .filter_map(NutritionRow::into_record)
        .collect();

    debug!(
        duplicates = read_count - unique_count,
        outliers = unique_count - representative_count,
        incomplete = representative_count - records.len(),
        "Nutrition rows removed"
    );
    info!(
        rows = records.len(),
        elapsed_ms = cleaning.elapsed().as_millis() as u64,
        "Nutrition data set cleaned"
    );
    Ok(records)
}
