use std::sync::Arc;

use arrow::{
    array::{
        Array, ArrayRef, ArrowPrimitiveType, AsArray, BooleanBuilder, DictionaryArray,
        FixedSizeBinaryBuilder, GenericByteBuilder, NullArray, PrimitiveArray, PrimitiveBuilder,
        RecordBatch,
    },
    datatypes::{
        ArrowDictionaryKeyType, BinaryType, ByteArrayType, DataType, Date32Type, Date64Type,
        Decimal128Type, Decimal256Type, DurationMicrosecondType, DurationMillisecondType,
        DurationNanosecondType, DurationSecondType, Float16Type, Float32Type, Float64Type,
        Int8Type, Int16Type, Int32Type, Int64Type, IntervalDayTimeType,
        IntervalMonthDayNanoType, IntervalUnit, IntervalYearMonthType, LargeBinaryType,
        LargeUtf8Type, Time32MillisecondType, Time32SecondType, Time64MicrosecondType,
        Time64NanosecondType, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
        TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type, UInt32Type,
        UInt64Type, Utf8Type,
    },
    record_batch::RecordBatchOptions,
};

use super::FilterMask;
use crate::error::{Result, TrellisError};

/// Keep the entries of `array` whose rows are included by `mask`.
///
/// The result has the same data type as `array` (including timestamp time
/// zone and decimal precision and scale) and `mask.included_count()` entries.
/// Dictionary arrays have their keys filtered and share the original values.
pub fn apply_mask(array: &dyn Array, mask: &FilterMask) -> Result<ArrayRef> {
    if array.len() != mask.len() {
        return Err(TrellisError::MaskLength {
            mask: mask.len(),
            array: array.len(),
        });
    }
    filter_array(array, mask)
}

/// Apply `mask` to every column of `batch`, keeping its schema.
pub fn apply_mask_to_batch(batch: &RecordBatch, mask: &FilterMask) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(TrellisError::MaskLength {
            mask: mask.len(),
            array: batch.num_rows(),
        });
    }
    let columns = batch
        .columns()
        .iter()
        .zip(batch.schema_ref().fields())
        .map(|(column, field)| {
            filter_array(column.as_ref(), mask).map_err(|err| match err {
                TrellisError::UnsupportedType {
                    operation,
                    data_type,
                    ..
                } => TrellisError::UnsupportedType {
                    operation,
                    column: field.name().clone(),
                    data_type,
                },
                err => err,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let options = RecordBatchOptions::new().with_row_count(Some(mask.included_count()));
    Ok(RecordBatch::try_new_with_options(
        batch.schema(),
        columns,
        &options,
    )?)
}

/// Whether [`apply_mask`] can filter arrays of `data_type`.
pub(crate) fn is_supported(data_type: &DataType) -> bool {
    match data_type {
        DataType::Null
        | DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Date32
        | DataType::Date64
        | DataType::Time32(TimeUnit::Second | TimeUnit::Millisecond)
        | DataType::Time64(TimeUnit::Microsecond | TimeUnit::Nanosecond)
        | DataType::Timestamp(..)
        | DataType::Duration(_)
        | DataType::Interval(_)
        | DataType::Decimal128(..)
        | DataType::Decimal256(..)
        | DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => true,
        DataType::Dictionary(key, value) => key.is_dictionary_key_type() && is_supported(value),
        _ => false,
    }
}

fn unsupported(data_type: &DataType) -> TrellisError {
    TrellisError::UnsupportedType {
        operation: "Filter mask application",
        column: String::new(),
        data_type: data_type.clone(),
    }
}

fn filter_array(array: &dyn Array, mask: &FilterMask) -> Result<ArrayRef> {
    let data_type = array.data_type();
    if !is_supported(data_type) {
        return Err(unsupported(data_type));
    }
    let filtered: ArrayRef = match data_type {
        DataType::Null => Arc::new(NullArray::new(mask.included_count())),
        DataType::Boolean => {
            let array = array.as_boolean();
            let mut builder = BooleanBuilder::with_capacity(mask.included_count());
            for row in mask.included_indices() {
                builder.append_option(array.is_valid(row).then(|| array.value(row)));
            }
            Arc::new(builder.finish())
        }
        DataType::Int8 => primitive::<Int8Type>(array, mask),
        DataType::Int16 => primitive::<Int16Type>(array, mask),
        DataType::Int32 => primitive::<Int32Type>(array, mask),
        DataType::Int64 => primitive::<Int64Type>(array, mask),
        DataType::UInt8 => primitive::<UInt8Type>(array, mask),
        DataType::UInt16 => primitive::<UInt16Type>(array, mask),
        DataType::UInt32 => primitive::<UInt32Type>(array, mask),
        DataType::UInt64 => primitive::<UInt64Type>(array, mask),
        DataType::Float16 => primitive::<Float16Type>(array, mask),
        DataType::Float32 => primitive::<Float32Type>(array, mask),
        DataType::Float64 => primitive::<Float64Type>(array, mask),
        DataType::Date32 => primitive::<Date32Type>(array, mask),
        DataType::Date64 => primitive::<Date64Type>(array, mask),
        DataType::Time32(TimeUnit::Second) => primitive::<Time32SecondType>(array, mask),
        DataType::Time32(TimeUnit::Millisecond) => {
            primitive::<Time32MillisecondType>(array, mask)
        }
        DataType::Time64(TimeUnit::Microsecond) => {
            primitive::<Time64MicrosecondType>(array, mask)
        }
        DataType::Time64(TimeUnit::Nanosecond) => primitive::<Time64NanosecondType>(array, mask),
        DataType::Timestamp(TimeUnit::Second, _) => primitive::<TimestampSecondType>(array, mask),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            primitive::<TimestampMillisecondType>(array, mask)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            primitive::<TimestampMicrosecondType>(array, mask)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            primitive::<TimestampNanosecondType>(array, mask)
        }
        DataType::Duration(TimeUnit::Second) => primitive::<DurationSecondType>(array, mask),
        DataType::Duration(TimeUnit::Millisecond) => {
            primitive::<DurationMillisecondType>(array, mask)
        }
        DataType::Duration(TimeUnit::Microsecond) => {
            primitive::<DurationMicrosecondType>(array, mask)
        }
        DataType::Duration(TimeUnit::Nanosecond) => {
            primitive::<DurationNanosecondType>(array, mask)
        }
        DataType::Interval(IntervalUnit::YearMonth) => {
            primitive::<IntervalYearMonthType>(array, mask)
        }
        DataType::Interval(IntervalUnit::DayTime) => primitive::<IntervalDayTimeType>(array, mask),
        DataType::Interval(IntervalUnit::MonthDayNano) => {
            primitive::<IntervalMonthDayNanoType>(array, mask)
        }
        DataType::Decimal128(..) => primitive::<Decimal128Type>(array, mask),
        DataType::Decimal256(..) => primitive::<Decimal256Type>(array, mask),
        DataType::Utf8 => bytes::<Utf8Type>(array, mask),
        DataType::LargeUtf8 => bytes::<LargeUtf8Type>(array, mask),
        DataType::Binary => bytes::<BinaryType>(array, mask),
        DataType::LargeBinary => bytes::<LargeBinaryType>(array, mask),
        DataType::Utf8View | DataType::BinaryView => {
            arrow::compute::filter(array, &mask.to_boolean_array())?
        }
        DataType::FixedSizeBinary(width) => {
            let array = array.as_fixed_size_binary();
            let mut builder = FixedSizeBinaryBuilder::with_capacity(mask.included_count(), *width);
            for row in mask.included_indices() {
                if array.is_valid(row) {
                    builder.append_value(array.value(row))?;
                } else {
                    builder.append_null();
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Dictionary(key, _) => match key.as_ref() {
            DataType::Int8 => dictionary::<Int8Type>(array, mask)?,
            DataType::Int16 => dictionary::<Int16Type>(array, mask)?,
            DataType::Int32 => dictionary::<Int32Type>(array, mask)?,
            DataType::Int64 => dictionary::<Int64Type>(array, mask)?,
            DataType::UInt8 => dictionary::<UInt8Type>(array, mask)?,
            DataType::UInt16 => dictionary::<UInt16Type>(array, mask)?,
            DataType::UInt32 => dictionary::<UInt32Type>(array, mask)?,
            DataType::UInt64 => dictionary::<UInt64Type>(array, mask)?,
            _ => return Err(unsupported(data_type)),
        },
        _ => return Err(unsupported(data_type)),
    };
    Ok(filtered)
}

fn filter_primitive<T: ArrowPrimitiveType>(
    array: &PrimitiveArray<T>,
    mask: &FilterMask,
) -> PrimitiveArray<T> {
    let mut builder = PrimitiveBuilder::<T>::with_capacity(mask.included_count())
        .with_data_type(array.data_type().clone());
    for row in mask.included_indices() {
        if array.is_valid(row) {
            builder.append_value(array.value(row));
        } else {
            builder.append_null();
        }
    }
    builder.finish()
}

fn primitive<T: ArrowPrimitiveType>(array: &dyn Array, mask: &FilterMask) -> ArrayRef {
    Arc::new(filter_primitive(array.as_primitive::<T>(), mask))
}

fn bytes<T: ByteArrayType>(array: &dyn Array, mask: &FilterMask) -> ArrayRef {
    let array = array.as_bytes::<T>();
    // Estimate value bytes from the share of included rows
    let data_capacity = if array.is_empty() {
        0
    } else {
        array.value_data().len() / array.len() * mask.included_count()
    };
    let mut builder = GenericByteBuilder::<T>::with_capacity(mask.included_count(), data_capacity);
    for row in mask.included_indices() {
        if array.is_valid(row) {
            builder.append_value(array.value(row));
        } else {
            builder.append_null();
        }
    }
    Arc::new(builder.finish())
}

fn dictionary<K: ArrowDictionaryKeyType>(array: &dyn Array, mask: &FilterMask) -> Result<ArrayRef> {
    let array = array.as_dictionary::<K>();
    let keys = filter_primitive(array.keys(), mask);
    Ok(Arc::new(DictionaryArray::<K>::try_new(
        keys,
        Arc::clone(array.values()),
    )?))
}
