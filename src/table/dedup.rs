//! Removal of exact duplicate rows.

use anyhow::Context;
use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::table::core::filter_record_batch;

/// Drop rows that are equal in every column, keeping the first occurrence
///
/// Nulls compare equal to each other.
pub fn drop_duplicates(batch: &RecordBatch) -> Result<RecordBatch> {
    if batch.num_rows() < 2 || batch.num_columns() == 0 {
        return Ok(batch.clone());
    }

    let schema = batch.schema();
    let fields = schema
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect_vec();

    let converter =
        RowConverter::new(fields).with_context(|| "Unsupported column type for deduplication")?;
    let rows = converter
        .convert_columns(batch.columns())
        .with_context(|| "Failed to encode rows for deduplication")?;

    let mut seen = FxHashSet::default();
    let mask = BooleanArray::from(rows.iter().map(|row| seen.insert(row)).collect_vec());

    let removed = batch.num_rows() - mask.true_count();
    if removed > 0 {
        log::info!("Removed {removed} duplicate rows");
    }

    filter_record_batch(batch, &mask)
}
