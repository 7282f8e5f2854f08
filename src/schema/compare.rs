use std::mem::discriminant;

use arrow_schema::{DataType, Field};

/// Whether two data types are the same for schema validation.
///
/// Nested types compare their element, value and child types recursively.
/// Time, timestamp, interval and fixed-size binary types compare their unit,
/// time zone or width. Every other type compares by kind alone, so decimals
/// of different precision, durations of different units and maps of
/// different sortedness all match.
pub fn types_match(expected: &DataType, actual: &DataType) -> bool {
    match (expected, actual) {
        (DataType::Dictionary(expected_key, expected_value), DataType::Dictionary(key, value)) => {
            types_match(expected_key, key) && types_match(expected_value, value)
        }
        (DataType::List(expected), DataType::List(actual))
        | (DataType::LargeList(expected), DataType::LargeList(actual))
        | (DataType::ListView(expected), DataType::ListView(actual))
        | (DataType::LargeListView(expected), DataType::LargeListView(actual)) => {
            types_match(expected.data_type(), actual.data_type())
        }
        (
            DataType::FixedSizeList(expected, expected_size),
            DataType::FixedSizeList(actual, size),
        ) => expected_size == size && types_match(expected.data_type(), actual.data_type()),
        (DataType::Struct(expected), DataType::Struct(actual)) => {
            expected.len() == actual.len()
                && expected
                    .iter()
                    .zip(actual.iter())
                    .all(|(expected, actual)| fields_match(expected, actual))
        }
        (DataType::Union(expected, expected_mode), DataType::Union(actual, mode)) => {
            expected_mode == mode
                && expected
                    .iter()
                    .map(|(id, _)| id)
                    .eq(actual.iter().map(|(id, _)| id))
        }
        (DataType::Time32(expected), DataType::Time32(actual))
        | (DataType::Time64(expected), DataType::Time64(actual)) => expected == actual,
        (DataType::Timestamp(expected_unit, expected_tz), DataType::Timestamp(unit, tz)) => {
            expected_unit == unit && expected_tz == tz
        }
        (DataType::Interval(expected), DataType::Interval(actual)) => expected == actual,
        (DataType::FixedSizeBinary(expected), DataType::FixedSizeBinary(actual)) => {
            expected == actual
        }
        _ => discriminant(expected) == discriminant(actual),
    }
}

/// Whether two fields have the same name, nullability and type.
///
/// Dictionary fields also compare their ordering flag, which arrow keeps on
/// the field rather than on the data type.
pub fn fields_match(expected: &Field, actual: &Field) -> bool {
    expected.name() == actual.name()
        && expected.is_nullable() == actual.is_nullable()
        && expected.dict_is_ordered() == actual.dict_is_ordered()
        && types_match(expected.data_type(), actual.data_type())
}
