//! Typed access to the columns of an Arrow record batch.
//!
//! Each reader casts its column to one canonical type up front, so the
//! nutrition loader and the corpus reader accept whatever numeric or string
//! width the file was written with.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, ListArray, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;

use crate::errors::{CorpusError, Result};
use crate::normalize::parse_list_literal;

/// Item field of every list-of-strings column
pub fn string_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Utf8, true))
}

/// `List<Utf8>` with the canonical item field
pub fn string_list_type() -> DataType {
    DataType::List(string_item_field())
}

fn column<'a>(batch: &'a RecordBatch, name: &str, location: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| CorpusError::MissingColumn {
            location: location.to_string(),
            column: name.to_string(),
        })
}

fn type_error(array: &ArrayRef, name: &str, location: &str) -> CorpusError {
    CorpusError::ColumnType {
        location: location.to_string(),
        column: name.to_string(),
        data_type: array.data_type().to_string(),
    }
}

fn cast_column(batch: &RecordBatch, name: &str, location: &str, to: &DataType) -> Result<ArrayRef> {
    let array = column(batch, name, location)?;
    cast(array.as_ref(), to).map_err(|_| type_error(array, name, location))
}

/// Text column
pub struct TextColumn(StringArray);

impl TextColumn {
    pub fn read(batch: &RecordBatch, name: &str, location: &str) -> Result<Self> {
        let array = cast_column(batch, name, location, &DataType::Utf8)?;
        let strings = array
            .as_string_opt::<i32>()
            .ok_or_else(|| type_error(&array, name, location))?;
        Ok(Self(strings.clone()))
    }

    pub fn get(&self, row: usize) -> Option<String> {
        (!self.0.is_null(row)).then(|| self.0.value(row).to_string())
    }
}

/// Floating point column; `NaN` reads as missing
pub struct FloatColumn(Float64Array);

impl FloatColumn {
    pub fn read(batch: &RecordBatch, name: &str, location: &str) -> Result<Self> {
        let array = cast_column(batch, name, location, &DataType::Float64)?;
        let values = array
            .as_primitive_opt::<Float64Type>()
            .ok_or_else(|| type_error(&array, name, location))?;
        Ok(Self(values.clone()))
    }

    pub fn get(&self, row: usize) -> Option<f64> {
        if self.0.is_null(row) {
            return None;
        }
        let value = self.0.value(row);
        (!value.is_nan()).then_some(value)
    }
}

/// Integer column; float sources are truncated
pub struct IntColumn(Int64Array);

impl IntColumn {
    pub fn read(batch: &RecordBatch, name: &str, location: &str) -> Result<Self> {
        let array = cast_column(batch, name, location, &DataType::Int64)?;
        let values = array
            .as_primitive_opt::<Int64Type>()
            .ok_or_else(|| type_error(&array, name, location))?;
        Ok(Self(values.clone()))
    }

    pub fn get(&self, row: usize) -> Option<i64> {
        (!self.0.is_null(row)).then(|| self.0.value(row))
    }
}

/// Boolean column
pub struct BoolColumn(BooleanArray);

impl BoolColumn {
    pub fn read(batch: &RecordBatch, name: &str, location: &str) -> Result<Self> {
        let array = cast_column(batch, name, location, &DataType::Boolean)?;
        let values = array
            .as_boolean_opt()
            .ok_or_else(|| type_error(&array, name, location))?;
        Ok(Self(values.clone()))
    }

    pub fn get(&self, row: usize) -> Option<bool> {
        (!self.0.is_null(row)).then(|| self.0.value(row))
    }
}

/// List-of-strings column, stored natively or as encoded list literals
pub enum ListColumn {
    Native(ListArray),
    Encoded(StringArray),
}

impl ListColumn {
    pub fn read(batch: &RecordBatch, name: &str, location: &str) -> Result<Self> {
        let array = column(batch, name, location)?;
        match array.data_type() {
            DataType::List(_) | DataType::LargeList(_) | DataType::FixedSizeList(_, _) => {
                let lists = cast(array.as_ref(), &string_list_type())
                    .map_err(|_| type_error(array, name, location))?;
                let lists = lists
                    .as_list_opt::<i32>()
                    .ok_or_else(|| type_error(array, name, location))?;
                Ok(ListColumn::Native(lists.clone()))
            }
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                let text = TextColumn::read(batch, name, location)?;
                Ok(ListColumn::Encoded(text.0))
            }
            _ => Err(type_error(array, name, location)),
        }
    }

    /// Items of a row; `None` when the cell is null or does not decode
    pub fn get(&self, row: usize) -> Option<Vec<String>> {
        match self {
            ListColumn::Native(lists) => {
                if lists.is_null(row) {
                    return None;
                }
                let values = lists.value(row);
                let strings = values.as_string_opt::<i32>()?;
                Some(
                    (0..strings.len())
                        .filter(|i| !strings.is_null(*i))
                        .map(|i| strings.value(i).to_string())
                        .collect(),
                )
            }
            ListColumn::Encoded(strings) => {
                if strings.is_null(row) {
                    None
                } else {
                    parse_list_literal(strings.value(row))
                }
            }
        }
    }
}
