//! SQLite output of the cleaned table

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, StringArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use crate::config::{IfExists, PipelineConfig};
use crate::error::util::validate_parent_directory;
use crate::error::{Error, Result};
use crate::utils::logging::{
    create_row_progress_bar, finish_and_clear, log_existing_table, log_operation_complete,
    log_operation_start,
};

/// Quote an identifier for use in SQL, doubling embedded quotes
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite column type for an Arrow data type
#[must_use]
pub fn sql_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Boolean => "INTEGER",
        DataType::Float16 | DataType::Float32 | DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}

/// Build the `CREATE TABLE` statement for a schema
#[must_use]
pub fn create_table_sql(table: &str, schema: &Schema) -> String {
    let columns = schema
        .fields()
        .iter()
        .map(|f| format!("{} {}", quote_identifier(f.name()), sql_type(f.data_type())))
        .join(", ");
    format!("CREATE TABLE {} ({columns})", quote_identifier(table))
}

/// Check whether a table exists in the database
///
/// Table names are matched case-insensitively, as SQLite resolves them.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![table],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to look up table '{table}'"))?;
    Ok(count > 0)
}

/// Converts one Arrow column into SQLite values
enum ColumnValues {
    Int(Vec<Option<i64>>),
    Real(Vec<Option<f64>>),
    Text(StringArray),
}

impl ColumnValues {
    fn from_array(array: &ArrayRef) -> Result<Self> {
        macro_rules! ints {
            ($ty:ty) => {
                array
                    .as_any()
                    .downcast_ref::<$ty>()
                    .map(|a| Self::Int(a.iter().map(|v| v.map(i64::from)).collect()))
            };
        }

        let converted = match array.data_type() {
            DataType::Int8 => ints!(Int8Array),
            DataType::Int16 => ints!(Int16Array),
            DataType::Int32 => ints!(Int32Array),
            DataType::Int64 => ints!(Int64Array),
            DataType::UInt8 => ints!(UInt8Array),
            DataType::UInt16 => ints!(UInt16Array),
            DataType::UInt32 => ints!(UInt32Array),
            DataType::UInt64 => array.as_any().downcast_ref::<UInt64Array>().map(|a| {
                // SQLite integers are signed; larger values are stored as REAL
                if a.iter().flatten().all(|v| i64::try_from(v).is_ok()) {
                    Self::Int(a.iter().map(|v| v.map(|v| v as i64)).collect())
                } else {
                    Self::Real(a.iter().map(|v| v.map(|v| v as f64)).collect())
                }
            }),
            DataType::Boolean => array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .map(|a| Self::Int(a.iter().map(|v| v.map(i64::from)).collect())),
            DataType::Float32 => array
                .as_any()
                .downcast_ref::<Float32Array>()
                .map(|a| Self::Real(a.iter().map(|v| v.map(f64::from)).collect())),
            DataType::Float64 => array
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|a| Self::Real(a.iter().collect())),
            _ => {
                let text = cast(array, &DataType::Utf8)
                    .with_context(|| format!("Cannot store {} as text", array.data_type()))?;
                text.as_any()
                    .downcast_ref::<StringArray>()
                    .cloned()
                    .map(Self::Text)
            }
        };

        converted.ok_or_else(|| anyhow::anyhow!("Unexpected array for {}", array.data_type()))
    }

    fn value(&self, row: usize) -> Value {
        match self {
            Self::Int(values) => values[row].map_or(Value::Null, Value::Integer),
            Self::Real(values) => values[row].map_or(Value::Null, Value::Real),
            Self::Text(array) => {
                if array.is_null(row) {
                    Value::Null
                } else {
                    Value::Text(array.value(row).to_string())
                }
            }
        }
    }
}

/// Write a table into an open connection, honouring the existing-table policy
///
/// Returns the number of rows inserted.
pub fn write_table(
    conn: &mut Connection,
    batch: &RecordBatch,
    table: &str,
    if_exists: IfExists,
    show_progress: bool,
) -> Result<usize> {
    let exists = table_exists(conn, table)?;
    let schema = batch.schema();

    let tx = conn
        .transaction()
        .with_context(|| "Failed to start transaction")?;

    match (exists, if_exists) {
        (true, IfExists::Fail) => {
            return Err(Error::TableExists {
                table: table.to_string(),
                path: tx.path().map(Into::into).unwrap_or_default(),
            }
            .into());
        }
        (true, IfExists::Replace) => {
            log_existing_table(table, "Replacing");
            tx.execute(&format!("DROP TABLE {}", quote_identifier(table)), [])
                .with_context(|| format!("Failed to drop table '{table}'"))?;
            tx.execute(&create_table_sql(table, &schema), [])
                .with_context(|| format!("Failed to create table '{table}'"))?;
        }
        (true, IfExists::Append) => {
            log_existing_table(table, "Appending to");
        }
        (false, _) => {
            tx.execute(&create_table_sql(table, &schema), [])
                .with_context(|| format!("Failed to create table '{table}'"))?;
        }
    }

    let columns = batch
        .columns()
        .iter()
        .map(ColumnValues::from_array)
        .collect::<Result<Vec<_>>>()?;

    let insert = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        schema
            .fields()
            .iter()
            .map(|f| quote_identifier(f.name()))
            .join(", "),
        (1..=columns.len()).map(|i| format!("?{i}")).join(", ")
    );

    let pb = create_row_progress_bar(batch.num_rows() as u64, Some(table), show_progress);
    {
        let mut stmt = tx
            .prepare_cached(&insert)
            .with_context(|| format!("Failed to prepare insert into '{table}'"))?;
        for row in 0..batch.num_rows() {
            let values = columns.iter().map(|c| c.value(row)).collect_vec();
            stmt.execute(params_from_iter(values.iter()))
                .with_context(|| format!("Failed to insert row {row} into '{table}'"))?;
            pb.inc(1);
        }
    }
    finish_and_clear(&pb);

    tx.commit()
        .with_context(|| format!("Failed to commit rows into '{table}'"))?;

    Ok(batch.num_rows())
}

/// Save the cleaned table into the SQLite database at `path`
///
/// The database file is created when missing. With the default policy an
/// already existing table makes the call fail.
pub fn save_data(batch: &RecordBatch, path: &Path, config: &PipelineConfig) -> Result<usize> {
    let start = Instant::now();
    log_operation_start("Saving table to", path);

    validate_parent_directory(path, "creating the database")?;
    let mut conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    let written = write_table(
        &mut conn,
        batch,
        &config.table_name,
        config.if_exists,
        config.show_progress,
    )
    .map_err(|e| match e.downcast::<Error>() {
        Ok(Error::TableExists { table, .. }) => Error::TableExists {
            table,
            path: path.to_path_buf(),
        }
        .into(),
        Ok(other) => other.into(),
        Err(e) => e,
    })?;

    log_operation_complete("saved", path, written, start.elapsed());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::Field;
    use std::sync::Arc;

    fn sample() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            (
                "message",
                Arc::new(StringArray::from(vec![Some("it's \"wet\""), None])) as ArrayRef,
            ),
            ("score", Arc::new(Float64Array::from(vec![0.5, 1.0])) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_table_sql() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("weird\"name", DataType::Utf8, true),
            Field::new("flag", DataType::Boolean, true),
        ]);
        assert_eq!(
            create_table_sql("RESPONSES", &schema),
            "CREATE TABLE \"RESPONSES\" (\"id\" INTEGER, \"weird\"\"name\" TEXT, \"flag\" INTEGER)"
        );
    }

    #[test]
    fn test_write_and_read_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        let written = write_table(&mut conn, &sample(), "RESPONSES", IfExists::Fail, false).unwrap();
        assert_eq!(written, 2);

        let (message, score): (Option<String>, f64) = conn
            .query_row(
                "SELECT message, score FROM RESPONSES WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(message.as_deref(), Some("it's \"wet\""));
        assert!((score - 0.5).abs() < f64::EPSILON);

        let null_message: Option<String> = conn
            .query_row("SELECT message FROM RESPONSES WHERE id = 2", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(null_message.is_none());
    }

    #[test]
    fn test_if_exists_policies() {
        let mut conn = Connection::open_in_memory().unwrap();
        write_table(&mut conn, &sample(), "RESPONSES", IfExists::Fail, false).unwrap();

        let err = write_table(&mut conn, &sample(), "RESPONSES", IfExists::Fail, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::TableExists { .. })
        ));

        write_table(&mut conn, &sample(), "RESPONSES", IfExists::Append, false).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM RESPONSES", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);

        write_table(&mut conn, &sample(), "RESPONSES", IfExists::Replace, false).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM RESPONSES", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    fn lowercase_table(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE responses (id INTEGER, message TEXT, score REAL);
             INSERT INTO responses VALUES (9, 'old', 0.0);",
        )
        .unwrap();
    }

    fn row_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM RESPONSES", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_table_lookup_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        lowercase_table(&conn);
        assert!(table_exists(&conn, "RESPONSES").unwrap());
        assert!(table_exists(&conn, "Responses").unwrap());
        assert!(!table_exists(&conn, "messages").unwrap());
    }

    #[test]
    fn test_fail_policy_on_differently_cased_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        lowercase_table(&conn);

        let err = write_table(&mut conn, &sample(), "RESPONSES", IfExists::Fail, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::TableExists { .. })
        ));
        assert_eq!(row_count(&conn), 1);
    }

    #[test]
    fn test_replace_policy_on_differently_cased_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        lowercase_table(&conn);

        write_table(&mut conn, &sample(), "RESPONSES", IfExists::Replace, false).unwrap();
        assert_eq!(row_count(&conn), 2);
    }

    #[test]
    fn test_append_policy_on_differently_cased_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        lowercase_table(&conn);

        write_table(&mut conn, &sample(), "RESPONSES", IfExists::Append, false).unwrap();
        assert_eq!(row_count(&conn), 3);
    }
}
