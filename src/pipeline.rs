//! The load, clean and save sequence behind the `process_data` command.

use std::path::Path;

use anyhow::Context;

use crate::clean::clean_data;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::load_data;
use crate::store::save_data;
use crate::utils::logging::{create_spinner, finish_and_clear, print_table_summary};

/// Paths handled by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelinePaths<'a> {
    pub messages: &'a Path,
    pub categories: &'a Path,
    pub database: &'a Path,
}

/// Run all three stages, printing a progress line per stage
///
/// Returns the number of rows written to the database.
pub fn run(paths: &PipelinePaths<'_>, config: &PipelineConfig) -> Result<usize> {
    println!(
        "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
        paths.messages.display(),
        paths.categories.display()
    );
    let spinner = create_spinner(Some("loading"), config.show_progress);
    let joined = load_data(paths.messages, paths.categories, config);
    finish_and_clear(&spinner);
    let joined = joined?;

    println!("Cleaning data...");
    let cleaned = clean_data(&joined, config).with_context(|| "Failed to clean data")?;
    print_table_summary(&cleaned);

    println!("Saving data...\n    DATABASE: {}", paths.database.display());
    let written = save_data(&cleaned, paths.database, config)
        .with_context(|| format!("Failed to save data to {}", paths.database.display()))?;

    println!("Cleaned data saved to database!");
    Ok(written)
}
