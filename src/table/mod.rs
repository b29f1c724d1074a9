//! In-memory table operations on Arrow record batches.

pub mod core;
pub mod dedup;
pub mod join;

pub use self::core::{drop_column, filter_record_batch, hstack, string_column, take_record_batch};
pub use dedup::drop_duplicates;
pub use join::inner_join;
