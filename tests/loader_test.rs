mod utils;

use disaster_pipeline::{Error, load_data, read_csv};
use utils::{Fixture, column_names, int_values, test_config};

#[test]
fn test_join_keeps_matching_pairs_only() {
    let fixture = Fixture::sample();
    let joined = load_data(&fixture.messages, &fixture.categories, &test_config()).unwrap();

    // id 7 matches two category rows, id 99 has no message
    assert_eq!(int_values(&joined, "id"), vec![2, 7, 7, 8, 9, 12]);
    assert_eq!(
        column_names(&joined),
        vec!["id", "message", "original", "genre", "categories"]
    );
}

#[test]
fn test_join_row_count_equals_matching_ids() {
    let messages = "id,message\n1,a\n2,b\n3,c\n";
    let categories = "id,categories\n3,related-1\n1,related-0\n5,related-1\n";
    let fixture = Fixture::new(messages, categories);

    let joined = load_data(&fixture.messages, &fixture.categories, &test_config()).unwrap();
    assert_eq!(joined.num_rows(), 2);
    assert_eq!(int_values(&joined, "id"), vec![1, 3]);
}

#[test]
fn test_no_shared_ids_gives_empty_table() {
    let fixture = Fixture::new("id,message\n1,a\n", "id,categories\n2,related-1\n");
    let joined = load_data(&fixture.messages, &fixture.categories, &test_config()).unwrap();
    assert_eq!(joined.num_rows(), 0);
}

#[test]
fn test_missing_input_file() {
    let fixture = Fixture::sample();
    let missing = fixture.dir.path().join("missing.csv");

    let err = load_data(&missing, &fixture.categories, &test_config()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::FileNotFound { .. })
    ));
}

#[test]
fn test_missing_id_column() {
    let fixture = Fixture::new("key,message\n1,a\n", "id,categories\n1,related-1\n");
    let err = load_data(&fixture.messages, &fixture.categories, &test_config()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ColumnNotFound { column }) if column == "id"
    ));
}

#[test]
fn test_header_only_file() {
    let fixture = Fixture::new("id,message\n", "id,categories\n");
    let batch = read_csv(&fixture.messages, &test_config()).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 2);
}
