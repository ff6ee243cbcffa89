//! Loader for the row-oriented measurements dataset.

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{CorpusError, Result};
use crate::models::RawMeasurementRecord;
use crate::normalize::{clean_steps, parse_list_literal, required_text};
use crate::sources::{SourceData, SourceLocation};

/// Columns projected from the measurements source
pub const MEASUREMENT_COLUMNS: [&str; 5] = ["title", "ingredients", "directions", "link", "NER"];

/// A measurements row as read; list columns are still encoded
#[derive(Debug, Clone, Deserialize)]
struct MeasurementRow {
    title: Option<String>,
    ingredients: Option<String>,
    directions: Option<String>,
    link: Option<String>,
    #[serde(rename = "NER")]
    ner: Option<String>,
}

impl MeasurementRow {
    fn into_record(self) -> Option<RawMeasurementRecord> {
        let directions = parse_list_literal(self.directions.as_deref()?)?;
        Some(RawMeasurementRecord {
            title: required_text(self.title)?,
            ingredients: parse_list_literal(self.ingredients.as_deref()?)?,
            directions: clean_steps(&directions)?,
            link: required_text(self.link)?,
            ner: parse_list_literal(self.ner.as_deref()?)?,
        })
    }
}

fn decode_rows<R: Read>(reader: R, location: &str) -> Result<Vec<MeasurementRow>> {
    let csv_error = |source| CorpusError::Csv {
        location: location.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new().flexible(false).from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    for column in MEASUREMENT_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(CorpusError::MissingColumn {
                location: location.to_string(),
                column: column.to_string(),
            });
        }
    }

    reader
        .deserialize::<MeasurementRow>()
        .map(|row| row.map_err(csv_error))
        .collect()
}

fn read_rows(location: &SourceLocation) -> Result<Vec<MeasurementRow>> {
    let name = location.to_string();
    match location.open()? {
        SourceData::File(file) => decode_rows(file, &name),
        SourceData::Memory(bytes) => decode_rows(Cursor::new(bytes), &name),
    }
}

/// Load, de-duplicate and normalize the measurements source
pub fn load_measurements(location: &SourceLocation) -> Result<Vec<RawMeasurementRecord>> {
    load_measurements_matching(location, None)
}

/// Like [`load_measurements`], skipping rows whose title is not in `titles`
///
/// Skipped rows are never decoded. De-duplication runs on the raw
/// `(title, directions)` text before any list decoding.
pub fn load_measurements_matching(
    location: &SourceLocation,
    titles: Option<&HashSet<String>>,
) -> Result<Vec<RawMeasurementRecord>> {
    let started = Instant::now();
    let rows = read_rows(location)?;
    let read_count = rows.len();
    info!(
        source = %location,
        rows = read_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Measurements data set loaded"
    );

    let cleaning = Instant::now();
    let candidates: Vec<MeasurementRow> = match titles {
        Some(titles) => rows
            .into_iter()
            .filter(|row| {
                row.title
                    .as_deref()
                    .is_some_and(|title| titles.contains(title.trim()))
            })
            .collect(),
        None => rows,
    };
    let candidate_count = candidates.len();

    let mut seen = HashSet::new();
    let unique: Vec<MeasurementRow> = candidates
        .into_iter()
        .filter(|row| seen.insert((row.title.clone(), row.directions.clone())))
        .collect();
    let unique_count = unique.len();

    let records: Vec<RawMeasurementRecord> = unique
        .into_iter()
        .filter_map(MeasurementRow::into_record)
        .collect();

    debug!(
        unmatched = read_count - candidate_count,
        duplicates = candidate_count - unique_count,
        undecodable = unique_count - records.len(),
        "Measurement rows removed"
    );
    info!(
        rows = records.len(),
        elapsed_ms = cleaning.elapsed().as_millis() as u64,
        "Measurements data set cleaned"
    );
    Ok(records)
}
