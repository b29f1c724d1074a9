//! ETL for disaster response messages: loads the message and category CSV
//! files, joins them on their id, expands the encoded categories into one
//! integer column each and stores the cleaned table in SQLite.

pub mod clean;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod store;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{IfExists, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{PipelinePaths, run};

// Stage entry points
pub use clean::{CategorySet, clean_data};
pub use loader::{load_data, read_csv};
pub use store::save_data;

// Arrow types
pub use arrow::record_batch::RecordBatch;
