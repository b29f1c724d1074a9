//! Inner join of two record batches on a shared key column.

use anyhow::Context;
use arrow::array::{Array, UInt32Array};
use arrow::row::{RowConverter, SortField};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::table::core::{column_index, drop_column, hstack, take_record_batch};

/// Join two tables, keeping only rows whose key appears in both
///
/// Output rows follow the left table's order; a left row matching several
/// right rows yields one output row per match, in right table order. The
/// key column is kept once, from the left table. Null keys never match.
///
/// # Errors
/// Returns an error if either table lacks the key column or the key columns
/// have different types
pub fn inner_join(left: &RecordBatch, right: &RecordBatch, key: &str) -> Result<RecordBatch> {
    let left_key = left.column(column_index(left, key)?);
    let right_key = right.column(column_index(right, key)?);

    if left_key.data_type() != right_key.data_type() {
        return Err(Error::KeyTypeMismatch {
            column: key.to_string(),
            left: left_key.data_type().to_string(),
            right: right_key.data_type().to_string(),
        }
        .into());
    }

    let converter = RowConverter::new(vec![SortField::new(left_key.data_type().clone())])
        .with_context(|| format!("Unsupported join key type for '{key}'"))?;
    let left_rows = converter
        .convert_columns(&[left_key.clone()])
        .with_context(|| format!("Failed to encode left key '{key}'"))?;
    let right_rows = converter
        .convert_columns(&[right_key.clone()])
        .with_context(|| format!("Failed to encode right key '{key}'"))?;

    let mut right_index: FxHashMap<_, Vec<u32>> = FxHashMap::default();
    for idx in 0..right.num_rows() {
        if right_key.is_null(idx) {
            continue;
        }
        right_index
            .entry(right_rows.row(idx))
            .or_default()
            .push(to_u32(idx)?);
    }

    let mut left_take = Vec::with_capacity(left.num_rows());
    let mut right_take = Vec::with_capacity(left.num_rows());
    for idx in 0..left.num_rows() {
        if left_key.is_null(idx) {
            continue;
        }
        if let Some(matches) = right_index.get(&left_rows.row(idx)) {
            let left_idx = to_u32(idx)?;
            for right_idx in matches {
                left_take.push(left_idx);
                right_take.push(*right_idx);
            }
        }
    }

    log::debug!(
        "Joined {} left rows with {} right rows on '{key}': {} matches",
        left.num_rows(),
        right.num_rows(),
        left_take.len()
    );

    let left_part = take_record_batch(left, &UInt32Array::from(left_take))?;
    let right_part = take_record_batch(&drop_column(right, key)?, &UInt32Array::from(right_take))?;

    hstack(&left_part, &right_part)
}

fn to_u32(idx: usize) -> Result<u32> {
    u32::try_from(idx).with_context(|| format!("Row index {idx} exceeds the join limit"))
}
