//! Expansion of the encoded categories field
//!
//! A categories value packs labelled flags as `name-value;name-value;...`.
//! The names are read from the first row only and every row is expected to
//! carry the same fragments in the same order; each fragment contributes the
//! integer value of its last character.

use arrow::array::{Array, Int64Array};
use arrow::datatypes::Int64Type;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::table::string_column;

/// Category names derived from the first encoded row, in fragment order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// Derive the names from one encoded value: each fragment's text before
    /// the first value separator
    #[must_use]
    pub fn from_encoded(encoded: &str, config: &PipelineConfig) -> Self {
        let names = encoded
            .split(config.category_separator)
            .map(|fragment| {
                fragment
                    .split(config.value_separator)
                    .next()
                    .unwrap_or(fragment)
                    .to_string()
            })
            .collect();
        Self { names }
    }

    /// Category names in encoded order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no category was decoded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Positions of every category with the given name
    pub fn positions<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.names.iter().positions(move |n| n == name)
    }
}

/// Parse the value of one fragment from its last character
fn fragment_value(fragment: &str, column: &str, row: usize) -> Result<i64> {
    let last = fragment.chars().last();
    last.and_then(|c| c.to_digit(10))
        .map(i64::from)
        .ok_or_else(|| {
            Error::InvalidCategoryValue {
                column: column.to_string(),
                row,
                value: last.map(String::from).unwrap_or_default(),
            }
            .into()
        })
}

/// Split the categories column into one integer array per category
///
/// # Errors
/// Returns an error if the table is empty, a row is null or has a different
/// number of fragments than the first row, or a fragment does not end in a
/// digit
pub fn split_categories(
    batch: &RecordBatch,
    config: &PipelineConfig,
) -> Result<(CategorySet, Vec<Int64Array>)> {
    let encoded = string_column(batch, &config.categories_column)?;
    if encoded.is_empty() {
        return Err(Error::EmptyTable.into());
    }
    if encoded.is_null(0) {
        return Err(Error::MissingCategories { row: 0 }.into());
    }

    let categories = CategorySet::from_encoded(encoded.value(0), config);
    log::info!(
        "Derived {} categories from the first row: {}",
        categories.len(),
        categories.names().join(", ")
    );

    let mut values: Vec<Vec<i64>> = (0..categories.len())
        .map(|_| Vec::with_capacity(encoded.len()))
        .collect();

    for row in 0..encoded.len() {
        if encoded.is_null(row) {
            return Err(Error::MissingCategories { row }.into());
        }

        let fragments = encoded
            .value(row)
            .split(config.category_separator)
            .collect_vec();
        if fragments.len() != categories.len() {
            return Err(Error::CategoryShape {
                row,
                expected: categories.len(),
                found: fragments.len(),
            }
            .into());
        }

        for ((fragment, name), column) in fragments
            .iter()
            .zip(categories.names())
            .zip(values.iter_mut())
        {
            column.push(fragment_value(fragment, name, row)?);
        }
    }

    let arrays = values.into_iter().map(Int64Array::from).collect();
    Ok((categories, arrays))
}

/// Rewrite every `from` value to `to`, leaving all other values untouched
#[must_use]
pub fn clamp_values(array: &Int64Array, from: i64, to: i64) -> Int64Array {
    array.unary::<_, Int64Type>(|v| if v == from { to } else { v })
}
