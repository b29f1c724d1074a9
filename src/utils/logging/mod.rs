//! Logging utilities for output and progress tracking

pub mod console;
pub mod log;
pub mod progress;

pub use console::print_table_summary;
pub use self::log::{
    log_existing_table, log_join_summary, log_operation_complete, log_operation_start,
};
pub use progress::{create_row_progress_bar, create_spinner, finish_and_clear};
