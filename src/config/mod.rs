//! Configuration for the message processing pipeline.

/// Default number of CSV records decoded per batch
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Name of the table the cleaned data is written to
pub const DEFAULT_TABLE_NAME: &str = "RESPONSES";

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("CSV_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|size| *size > 0)
}

/// What to do when the destination table already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IfExists {
    /// Refuse to write
    #[default]
    Fail,
    /// Drop the existing table and write a fresh one
    Replace,
    /// Insert the rows into the existing table
    Append,
}

/// Configuration for loading, cleaning and saving the message data
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Column both input files are joined on
    pub id_column: String,
    /// Column holding the encoded `name-value;name-value` categories
    pub categories_column: String,
    /// Separator between category fragments
    pub category_separator: char,
    /// Separator between a category name and its value
    pub value_separator: char,
    /// Category whose `clamp_from` values are rewritten to `clamp_to`
    pub clamp_column: Option<String>,
    /// Raw value to rewrite in the clamp column
    pub clamp_from: i64,
    /// Replacement value for the clamp column
    pub clamp_to: i64,
    /// Destination table name
    pub table_name: String,
    /// Policy for an already existing destination table
    pub if_exists: IfExists,
    /// Field delimiter of the input files
    pub csv_delimiter: u8,
    /// Number of records decoded per CSV batch
    pub batch_size: usize,
    /// Records scanned for schema inference (`None` scans the whole file)
    pub schema_inference_rows: Option<usize>,
    /// Draw progress bars and spinners
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            categories_column: "categories".to_string(),
            category_separator: ';',
            value_separator: '-',
            clamp_column: Some("related".to_string()),
            clamp_from: 2,
            clamp_to: 1,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            if_exists: IfExists::Fail,
            csv_delimiter: b',',
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
            schema_inference_rows: None,
            show_progress: true,
        }
    }
}
