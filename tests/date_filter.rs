use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Date64Array, Int32Array, RecordBatch};
use chrono::{Days, NaiveDate};
use trellis::{Filter, Predicate};

const MILLISECONDS_IN_DAY: i64 = 86_400_000;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(date_epoch()).num_days() as i32
}

fn date_epoch() -> NaiveDate {
    date(1970, 1, 1)
}

/// A leading null followed by one hundred days from 2024-01-01.
fn date_arrays() -> Vec<ArrayRef> {
    let days: Vec<Option<i32>> = std::iter::once(None)
        .chain((0..100).map(|i| Some(days_since_epoch(date(2024, 1, 1) + Days::new(i)))))
        .collect();
    let millis: Vec<Option<i64>> = days
        .iter()
        .map(|d| d.map(|d| i64::from(d) * MILLISECONDS_IN_DAY))
        .collect();
    vec![
        Arc::new(Date32Array::from(days)),
        Arc::new(Date64Array::from(millis)),
    ]
}

#[test]
fn compute_mask_over_date_types() {
    let filter = Filter::builder()
        .with_date_range("date", date(2024, 2, 1), date(2024, 2, 10))
        .build();
    for array in date_arrays() {
        let data_type = array.data_type().clone();
        let batch = RecordBatch::try_from_iter(vec![("date", array)]).unwrap();
        let mask = filter.compute_mask(&batch).unwrap().unwrap();

        assert_eq!(mask.included_count(), 10, "expected ten days for {data_type:?}");
        for row in 0..batch.num_rows() {
            let expected = (32..=41).contains(&row);
            assert_eq!(mask.is_included(row), expected, "row {row} for {data_type:?}");
        }
    }
}

#[test]
fn dates_before_epoch() {
    let days = vec![
        days_since_epoch(date(1969, 12, 30)),
        days_since_epoch(date(1969, 12, 31)),
        days_since_epoch(date(1970, 1, 1)),
    ];
    let millis: Vec<i64> = days.iter().map(|d| i64::from(*d) * MILLISECONDS_IN_DAY).collect();
    let predicate = Predicate::date_range("date", date(1969, 12, 31), date(1969, 12, 31));
    for array in [
        Arc::new(Date32Array::from(days)) as ArrayRef,
        Arc::new(Date64Array::from(millis)) as ArrayRef,
    ] {
        let batch = RecordBatch::try_from_iter(vec![("date", array)]).unwrap();
        let mask = predicate.compute_mask(&batch).unwrap().unwrap();
        assert_eq!(mask.included_indices().collect::<Vec<_>>(), vec![1]);
    }
}

#[test]
fn date_range_on_partition() {
    let info = trellis::PartitionInformation::new(
        RecordBatch::try_from_iter(vec![(
            "date",
            Arc::new(Date32Array::from(vec![days_since_epoch(date(2024, 2, 5))])) as ArrayRef,
        )])
        .unwrap(),
    )
    .unwrap();
    let inside = Filter::builder()
        .with_date_range("date", date(2024, 2, 1), date(2024, 2, 10))
        .build();
    let outside = Filter::builder()
        .with_date_range("date", date(2024, 3, 1), date(2024, 3, 10))
        .build();
    assert!(inside.include_partition(&info).unwrap());
    assert!(!outside.include_partition(&info).unwrap());
}

#[test]
fn invalid_column_type() {
    let filter = Filter::builder()
        .with_date_range("date", date(2024, 2, 1), date(2024, 2, 10))
        .build();
    let batch = RecordBatch::try_from_iter(vec![(
        "date",
        Arc::new(Int32Array::from_iter_values(0..100)) as ArrayRef,
    )])
    .unwrap();
    let err = filter.compute_mask(&batch).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Date range filter for column 'date' does not support arrays with type Int32"
    );
}
