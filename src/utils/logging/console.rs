//! Console output utilities

use arrow::record_batch::RecordBatch;

/// Print the row count and column layout of a table
pub fn print_table_summary(batch: &RecordBatch) {
    println!(
        "    {} rows x {} columns",
        batch.num_rows(),
        batch.num_columns()
    );
    for field in batch.schema().fields() {
        log::debug!("  - {} ({})", field.name(), field.data_type());
    }
}
