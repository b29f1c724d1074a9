//! CSV loading and joining of the message and category datasets

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::error::util::safe_open_file;
use crate::table::inner_join;
use crate::utils::logging::{log_join_summary, log_operation_complete, log_operation_start};

/// Read a delimited file with a header row into a single record batch
///
/// Column types are inferred from the data; integers become `Int64`, text
/// stays `Utf8` and empty fields are read as nulls. Rows with fewer fields
/// than the header are accepted; their missing trailing fields are nulls.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `config` - Delimiter, batch size and inference settings
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid CSV
pub fn read_csv(path: &Path, config: &PipelineConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut file = safe_open_file(path, "reading CSV file")?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.csv_delimiter)
        .with_truncated_rows(true);
    let (schema, scanned) = format
        .infer_schema(&mut file, config.schema_inference_rows)
        .with_context(|| format!("Failed to infer schema of {}", path.display()))?;
    log::debug!(
        "Inferred {} columns from {scanned} records of {}",
        schema.fields().len(),
        path.display()
    );
    file.rewind()
        .with_context(|| format!("Failed to rewind {}", path.display()))?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_truncated_rows(true)
        .with_batch_size(config.batch_size)
        .build(file)
        .with_context(|| format!("Failed to build CSV reader for {}", path.display()))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read record batch from {}", path.display()))?;
    let batch = concat_batches(&schema, &batches)
        .with_context(|| format!("Failed to combine batches of {}", path.display()))?;

    log_operation_complete("read", path, batch.num_rows(), start.elapsed());
    Ok(batch)
}

/// Load the messages and categories files and inner-join them on the id
/// column
///
/// Rows whose id is missing from either file are dropped. An empty result is
/// only logged.
pub fn load_data(
    messages_path: &Path,
    categories_path: &Path,
    config: &PipelineConfig,
) -> Result<RecordBatch> {
    let messages = read_csv(messages_path, config).with_context(|| "Failed to load messages")?;
    let categories =
        read_csv(categories_path, config).with_context(|| "Failed to load categories")?;

    let joined = inner_join(&messages, &categories, &config.id_column).with_context(|| {
        format!(
            "Failed to join {} and {} on '{}'",
            messages_path.display(),
            categories_path.display(),
            config.id_column
        )
    })?;

    log_join_summary(
        &config.id_column,
        messages.num_rows(),
        categories.num_rows(),
        joined.num_rows(),
    );

    Ok(joined)
}
