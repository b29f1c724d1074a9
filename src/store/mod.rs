//! Relational output of the cleaned data.

pub mod sqlite;

pub use sqlite::{save_data, table_exists, write_table};
