use std::sync::Arc;

use arrow::{
    array::{Array, AsArray},
    datatypes::Int64Type,
};
use arrow_schema::{DataType, Field, Schema};
use trellis::{HivePartitioning, Partitioning, TrellisError};

fn partitioning(fields: Vec<Field>) -> HivePartitioning {
    HivePartitioning::new(Arc::new(Schema::new(fields)))
}

#[test]
fn empty_schema_and_path() {
    let info = partitioning(vec![]).parse(&[]).unwrap();
    assert_eq!(info.batch().num_rows(), 1);
    assert_eq!(info.schema().fields().len(), 0);
}

#[test]
fn single_int_field() {
    let info = partitioning(vec![Field::new("x", DataType::Int64, true)])
        .parse(&["x=3"])
        .unwrap();
    assert_eq!(info.batch().num_rows(), 1);
    assert_eq!(info.schema().fields().len(), 1);
    assert_eq!(info.column("x").unwrap().as_primitive::<Int64Type>().value(0), 3);
}

#[test]
fn string_field_keeps_numeric_text() {
    let info = partitioning(vec![Field::new("x", DataType::Utf8, true)])
        .parse(&["x=3"])
        .unwrap();
    assert_eq!(info.column("x").unwrap().as_string::<i32>().value(0), "3");
}

#[test]
fn fields_follow_path_order() {
    let info = partitioning(vec![
        Field::new("x", DataType::Int64, true),
        Field::new("y", DataType::Utf8, true),
    ])
    .parse(&["y=hello", "x=4"])
    .unwrap();

    let names: Vec<_> = info.schema().fields().iter().map(|f| f.name().clone()).collect();
    assert_eq!(names, vec!["y", "x"]);
    assert_eq!(info.column("x").unwrap().as_primitive::<Int64Type>().value(0), 4);
    assert_eq!(info.column("y").unwrap().as_string::<i32>().value(0), "hello");
}

#[test]
fn partial_path_gives_field_subset() {
    let info = partitioning(vec![
        Field::new("x", DataType::Int64, true),
        Field::new("y", DataType::Utf8, true),
    ])
    .parse(&["x=4"])
    .unwrap();
    assert_eq!(info.schema().fields().len(), 1);
    assert!(info.column("y").is_none());
}

#[test]
fn null_sentinel() {
    let info = partitioning(vec![Field::new("x", DataType::Int64, true)])
        .parse(&["x=__HIVE_DEFAULT_PARTITION__"])
        .unwrap();
    let column = info.column("x").unwrap();
    assert_eq!(column.data_type(), &DataType::Int64);
    assert!(column.is_null(0));
}

#[test]
fn null_sentinel_for_non_nullable_field() {
    let err = partitioning(vec![Field::new("x", DataType::Int64, false)])
        .parse(&["x=__HIVE_DEFAULT_PARTITION__"])
        .unwrap_err();
    assert!(matches!(err, TrellisError::NullForNonNullableField { field } if field == "x"));
}

#[test]
fn unexpected_field_with_empty_schema() {
    let err = partitioning(vec![]).parse(&["column=value"]).unwrap_err();
    assert!(matches!(err, TrellisError::UnknownPartitionField { .. }));
}

#[test]
fn unknown_field_is_named() {
    let err = partitioning(vec![Field::new("x", DataType::Int64, true)])
        .parse(&["y=3"])
        .unwrap_err();
    assert!(matches!(err, TrellisError::UnknownPartitionField { .. }));
    assert!(err.to_string().contains("'y'"), "unexpected message: {err}");
}

#[test]
fn component_without_separator_is_named() {
    let err = partitioning(vec![Field::new("x", DataType::Int64, true)])
        .parse(&["x3"])
        .unwrap_err();
    assert!(matches!(err, TrellisError::InvalidPartitionPath { .. }));
    assert!(err.to_string().contains("'x3'"), "unexpected message: {err}");
}

#[test]
fn non_numeric_value_for_int_field() {
    let err = partitioning(vec![Field::new("x", DataType::Int64, true)])
        .parse(&["x=abc"])
        .unwrap_err();
    match err {
        TrellisError::InvalidPartitionValue { field, value, .. } => {
            assert_eq!((field.as_str(), value.as_str()), ("x", "abc"));
        }
        other => panic!("expected an invalid value error, got {other:?}"),
    }
}

#[test]
fn url_encoded_key_and_value() {
    let info = partitioning(vec![Field::new("x =#!/", DataType::Utf8, true)])
        .parse(&["x%20%3d%23%21%2f=%3a%3b%2b%27%22"])
        .unwrap();
    assert_eq!(info.schema().fields().len(), 1);
    assert_eq!(
        info.column("x =#!/").unwrap().as_string::<i32>().value(0),
        ":;+'\""
    );
}

#[test]
fn plus_decodes_to_space() {
    let info = partitioning(vec![
        Field::new("x", DataType::Utf8, true),
        Field::new("a b", DataType::Utf8, true),
    ])
    .parse(&["x=a+b", "a+b=c%2bd"])
    .unwrap();
    assert_eq!(info.column("x").unwrap().as_string::<i32>().value(0), "a b");
    assert_eq!(
        info.column("a b").unwrap().as_string::<i32>().value(0),
        "c+d"
    );
}
