use std::sync::Arc;

use arrow::{
    array::{ArrayRef, LargeStringArray, StringArray, StringViewArray, new_null_array},
    compute::{CastOptions, cast_with_options},
};
use arrow_schema::{DataType, Field};

use crate::error::{Result, TrellisError};

/// Parse one partition value into a single-element array of `field`'s type.
///
/// `None` produces a null. String types take the value verbatim; every other
/// type goes through a checked cast from UTF-8, so `"abc"` for an integer
/// field is an error rather than a null.
pub fn parse_scalar(field: &Field, value: Option<&str>) -> Result<ArrayRef> {
    let Some(value) = value else {
        return Ok(new_null_array(field.data_type(), 1));
    };
    let array: ArrayRef = match field.data_type() {
        DataType::Utf8 => Arc::new(StringArray::from(vec![value])),
        DataType::LargeUtf8 => Arc::new(LargeStringArray::from(vec![value])),
        DataType::Utf8View => Arc::new(StringViewArray::from(vec![value])),
        data_type => {
            let options = CastOptions {
                safe: false,
                ..Default::default()
            };
            cast_with_options(&StringArray::from(vec![value]), data_type, &options).map_err(
                |err| TrellisError::InvalidPartitionValue {
                    field: field.name().clone(),
                    value: value.to_string(),
                    data_type: data_type.clone(),
                    reason: err.to_string(),
                },
            )?
        }
    };
    Ok(array)
}

#[cfg(test)]
mod tests {
    use arrow::{
        array::{Array, AsArray},
        datatypes::{Date32Type, Int8Type, Int64Type, UInt16Type},
    };

    use super::*;

    #[test]
    fn integers_and_strings() {
        let field = Field::new("x", DataType::Int64, true);
        let array = parse_scalar(&field, Some("-42")).unwrap();
        assert_eq!(array.as_primitive::<Int64Type>().value(0), -42);

        let field = Field::new("x", DataType::UInt16, true);
        let array = parse_scalar(&field, Some("65535")).unwrap();
        assert_eq!(array.as_primitive::<UInt16Type>().value(0), u16::MAX);

        let field = Field::new("s", DataType::Utf8, true);
        let array = parse_scalar(&field, Some(" 3 ")).unwrap();
        assert_eq!(array.as_string::<i32>().value(0), " 3 ");
    }

    #[test]
    fn nulls_keep_the_field_type() {
        let field = Field::new("x", DataType::Int8, true);
        let array = parse_scalar(&field, None).unwrap();
        assert_eq!(array.data_type(), &DataType::Int8);
        assert!(array.is_null(0));
        assert_eq!(array.as_primitive::<Int8Type>().len(), 1);
    }

    #[test]
    fn dates() {
        let field = Field::new("d", DataType::Date32, true);
        let array = parse_scalar(&field, Some("1970-01-11")).unwrap();
        assert_eq!(array.as_primitive::<Date32Type>().value(0), 10);
    }

    #[test]
    fn unparseable_values_are_errors() {
        let field = Field::new("x", DataType::Int8, true);
        for value in ["abc", "128", ""] {
            let err = parse_scalar(&field, Some(value)).unwrap_err();
            assert!(
                matches!(&err, TrellisError::InvalidPartitionValue { field, .. } if field == "x"),
                "expected parse error for {value:?}, got {err}"
            );
        }
    }
}
