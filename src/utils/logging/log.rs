//! Log lines shared by the pipeline stages

use std::path::Path;
use std::time::Duration;

/// Log the start of reading or writing a file
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Log a finished file operation with its row count and duration
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Duration) {
    log::info!(
        "Successfully {operation} {rows} rows with {} in {elapsed:?}",
        path.display()
    );
}

/// Log the outcome of joining messages with categories on `key`
///
/// An empty join is logged as a warning.
pub fn log_join_summary(key: &str, messages: usize, categories: usize, joined: usize) {
    log::info!(
        "Joined {messages} messages with {categories} category rows on '{key}' into {joined} rows"
    );
    if joined == 0 {
        log::warn!("No '{key}' values shared between the messages and categories files");
    }
}

/// Log how a write met an already existing table
pub fn log_existing_table(table: &str, action: &str) {
    log::info!("{action} existing table '{table}'");
}
