//! Core table operations on Arrow record batches
//!
//! Row selection, column lookup and column-wise concatenation shared by the
//! join, the deduplication and the category expansion.

use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, StringArray, UInt32Array};
use arrow::compute::{cast, filter as arrow_filter, take};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Suffix given to a left-hand column whose name also appears on the right
pub const LEFT_SUFFIX: &str = "_x";

/// Suffix given to a right-hand column whose name also appears on the left
pub const RIGHT_SUFFIX: &str = "_y";

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(anyhow::anyhow!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()
        .with_context(|| "Failed to apply boolean filter to columns")?;

    let row_count = mask.true_count();
    with_row_count(batch.schema().fields().to_vec(), filtered_columns, row_count)
        .with_context(|| "Failed to create filtered record batch")
}

/// Gather rows of a record batch by position
///
/// Indices may repeat and appear in any order; the output has one row per
/// index.
pub fn take_record_batch(batch: &RecordBatch, indices: &UInt32Array) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| take(col.as_ref(), indices, None))
        .collect::<arrow::error::Result<_>>()
        .with_context(|| "Failed to gather rows")?;

    with_row_count(batch.schema().fields().to_vec(), columns, indices.len())
}

/// Build a record batch with an explicit row count, so batches without
/// columns keep their length
pub fn with_row_count(
    fields: Vec<FieldRef>,
    columns: Vec<ArrayRef>,
    row_count: usize,
) -> Result<RecordBatch> {
    let options = RecordBatchOptions::new().with_row_count(Some(row_count));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
        .with_context(|| "Failed to assemble record batch")
}

/// Find the index of a column by name
pub fn column_index(batch: &RecordBatch, column: &str) -> Result<usize> {
    batch.schema().index_of(column).map_err(|_| {
        Error::ColumnNotFound {
            column: column.to_string(),
        }
        .into()
    })
}

/// Get a column as UTF-8 strings, casting other types to their text form
pub fn string_column(batch: &RecordBatch, column: &str) -> Result<StringArray> {
    let array = batch.column(column_index(batch, column)?);
    let array = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast(array, &DataType::Utf8).map_err(|_| Error::ColumnType {
            column: column.to_string(),
            expected: "text".to_string(),
        })?
    };

    Ok(array.as_string::<i32>().clone())
}

/// Remove a column by name
pub fn drop_column(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let mut batch = batch.clone();
    batch.remove_column(idx);
    Ok(batch)
}

/// Concatenate two tables side by side, matching rows by position
///
/// Column names present on both sides get [`LEFT_SUFFIX`] and
/// [`RIGHT_SUFFIX`] appended.
pub fn hstack(left: &RecordBatch, right: &RecordBatch) -> Result<RecordBatch> {
    if left.num_rows() != right.num_rows() {
        return Err(anyhow::anyhow!(
            "Cannot concatenate tables with {} and {} rows",
            left.num_rows(),
            right.num_rows()
        ));
    }

    let left_schema = left.schema();
    let right_schema = right.schema();
    let left_names: FxHashSet<&str> = left_schema.fields().iter().map(|f| f.name().as_str()).collect();
    let right_names: FxHashSet<&str> =
        right_schema.fields().iter().map(|f| f.name().as_str()).collect();

    let fields = left_schema
        .fields()
        .iter()
        .map(|f| with_suffix_if(f, right_names.contains(f.name().as_str()), LEFT_SUFFIX))
        .chain(
            right_schema
                .fields()
                .iter()
                .map(|f| with_suffix_if(f, left_names.contains(f.name().as_str()), RIGHT_SUFFIX)),
        )
        .collect();

    let columns = left
        .columns()
        .iter()
        .chain(right.columns())
        .cloned()
        .collect();

    with_row_count(fields, columns, left.num_rows())
}

fn with_suffix_if(field: &FieldRef, overlaps: bool, suffix: &str) -> FieldRef {
    if overlaps {
        let name = format!("{}{suffix}", field.name());
        log::debug!("Column '{}' exists on both sides, renamed to '{name}'", field.name());
        Arc::new(Field::clone(field).with_name(name))
    } else {
        field.clone()
    }
}
