//! Cleaning of the joined message table
//!
//! Replaces the encoded categories column with one integer column per
//! category and removes duplicate rows.

pub mod categories;

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, FieldRef};
use arrow::record_batch::RecordBatch;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::table::core::with_row_count;
use crate::table::{drop_column, drop_duplicates, hstack};

pub use categories::{CategorySet, clamp_values, split_categories};

/// Expand the categories column, clamp the configured category and drop
/// duplicate rows
///
/// Only the clamp column is rewritten; every other category keeps the value
/// parsed from its fragment.
///
/// # Errors
/// Returns an error if the categories cannot be parsed or the clamp column is
/// not among the derived categories
pub fn clean_data(batch: &RecordBatch, config: &PipelineConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    let (categories, mut values) = split_categories(batch, config)?;

    if let Some(clamp_column) = &config.clamp_column {
        let positions: Vec<usize> = categories.positions(clamp_column).collect();
        if positions.is_empty() {
            return Err(Error::ColumnNotFound {
                column: clamp_column.clone(),
            }
            .into());
        }
        for idx in positions {
            values[idx] = clamp_values(&values[idx], config.clamp_from, config.clamp_to);
        }
    }

    let fields: Vec<FieldRef> = categories
        .names()
        .iter()
        .map(|name| Arc::new(Field::new(name, DataType::Int64, false)))
        .collect();
    let columns: Vec<ArrayRef> = values
        .into_iter()
        .map(|array: Int64Array| Arc::new(array) as ArrayRef)
        .collect();
    let category_batch = with_row_count(fields, columns, batch.num_rows())?;

    let kept = drop_column(batch, &config.categories_column)?;
    let combined = hstack(&kept, &category_batch)?;
    let cleaned = drop_duplicates(&combined)?;

    log::info!(
        "Cleaned {} rows into {} rows x {} columns in {:?}",
        batch.num_rows(),
        cleaned.num_rows(),
        cleaned.num_columns(),
        start.elapsed()
    );

    Ok(cleaned)
}
