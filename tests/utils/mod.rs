#![allow(dead_code)]

use std::path::{Path, PathBuf};

use arrow::array::{Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use disaster_pipeline::PipelineConfig;
use tempfile::TempDir;

/// Messages file in the layout of the disaster response dataset
pub const MESSAGES_CSV: &str = "\
id,message,original,genre
2,Weather update - a cold front from Cuba that could pass over Haiti,Un front froid se retrouve sur Cuba,direct
7,Is the Hurricane over or is it not over,Cyclone nan fini osinon li pa fini,direct
8,Looking for someone but no name,,direct
9,\"UN reports Leogane 80-90 destroyed, only Hospital St. Croix functioning\",,news
12,\"says: west side of Haiti, rest of the country today and tonight\",,direct
";

/// Categories file matching [`MESSAGES_CSV`]; id 99 has no message and
/// id 7 appears twice with identical content
pub const CATEGORIES_CSV: &str = "\
id,categories
2,related-1;request-0;offer-0;aid_related-0
7,related-1;request-0;offer-0;aid_related-1
7,related-1;request-0;offer-0;aid_related-1
8,related-1;request-1;offer-0;aid_related-1
9,related-2;request-0;offer-2;aid_related-0
12,related-0;request-0;offer-0;aid_related-0
99,related-1;request-1;offer-1;aid_related-1
";

/// A temporary directory holding the input files and the database path
pub struct Fixture {
    pub dir: TempDir,
    pub messages: PathBuf,
    pub categories: PathBuf,
    pub database: PathBuf,
}

impl Fixture {
    /// Write the given CSV contents into a fresh temporary directory
    #[must_use]
    pub fn new(messages: &str, categories: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let messages_path = write_file(dir.path(), "disaster_messages.csv", messages);
        let categories_path = write_file(dir.path(), "disaster_categories.csv", categories);
        let database = dir.path().join("DisasterResponse.db");
        Self {
            dir,
            messages: messages_path,
            categories: categories_path,
            database,
        }
    }

    /// Fixture with the default sample data
    #[must_use]
    pub fn sample() -> Self {
        Self::new(MESSAGES_CSV, CATEGORIES_CSV)
    }
}

/// Write a file and return its path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

/// Pipeline configuration without progress output
#[must_use]
pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        show_progress: false,
        ..PipelineConfig::default()
    }
}

/// Integer column by name
pub fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> &'a Int64Array {
    let idx = batch
        .schema()
        .index_of(name)
        .unwrap_or_else(|_| panic!("column {name} missing"));
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap_or_else(|| panic!("column {name} is not Int64"))
}

/// String column by name
pub fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> &'a StringArray {
    let idx = batch
        .schema()
        .index_of(name)
        .unwrap_or_else(|_| panic!("column {name} missing"));
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap_or_else(|| panic!("column {name} is not Utf8"))
}

/// Column names in order
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

/// Values of an integer column, nulls rejected
pub fn int_values(batch: &RecordBatch, name: &str) -> Vec<i64> {
    let column = int_column(batch, name);
    assert_eq!(column.null_count(), 0, "column {name} has nulls");
    column.values().to_vec()
}
