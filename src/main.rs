use std::path::PathBuf;

use clap::Parser;
use disaster_pipeline::{IfExists, PipelineConfig, PipelinePaths, run};

const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. \n\nExample: process_data \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";

/// Clean the disaster messages and categories datasets into a SQLite table
#[derive(Parser, Debug)]
#[command(name = "process_data", version)]
struct Cli {
    /// <messages_path> <categories_path> <database_path>
    paths: Vec<PathBuf>,

    /// What to do when the table already exists
    #[arg(long, value_enum, default_value_t = IfExists::Fail)]
    if_exists: IfExists,

    /// Destination table name
    #[arg(long, default_value = disaster_pipeline::config::DEFAULT_TABLE_NAME)]
    table: String,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let [messages, categories, database] = cli.paths.as_slice() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = PipelineConfig {
        table_name: cli.table,
        if_exists: cli.if_exists,
        ..PipelineConfig::default()
    };
    let paths = PipelinePaths {
        messages,
        categories,
        database,
    };

    run(&paths, &config)?;
    Ok(())
}
