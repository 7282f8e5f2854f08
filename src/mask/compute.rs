use arrow::{
    array::{Array, ArrowPrimitiveType, AsArray, PrimitiveArray, RecordBatch},
    buffer::BooleanBuffer,
    datatypes::{
        DataType, Date32Type, Date64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
        UInt16Type, UInt32Type, UInt64Type,
    },
};
use chrono::{Datelike, NaiveDate};

use super::FilterMask;
use crate::{
    cmp::{FilterInt, Widened},
    error::{Result, TrellisError},
    expr::{Leaf, Node, Predicate, StringSet},
};

const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const MILLISECONDS_IN_DAY: i64 = 86_400_000;

/// Compute the inclusion mask of `predicate` over `batch`.
///
/// Returns `None` when the predicate does not constrain any column of the
/// batch. An `And` with one inapplicable side uses the other side's mask; an
/// `Or` with an inapplicable side yields `None` since it cannot exclude rows.
pub(crate) fn compute_mask(
    predicate: &Predicate,
    batch: &RecordBatch,
) -> Result<Option<FilterMask>> {
    let mask = evaluate(predicate, batch)?.map(FilterMask::new);
    if let Some(mask) = &mask {
        tracing::trace!(
            predicate = %predicate,
            rows = mask.len(),
            included = mask.included_count(),
            "computed row mask"
        );
    }
    Ok(mask)
}

fn evaluate(predicate: &Predicate, batch: &RecordBatch) -> Result<Option<BooleanBuffer>> {
    match predicate.node() {
        Node::And(left, right) => {
            let mask = match (evaluate(left, batch)?, evaluate(right, batch)?) {
                (Some(left), Some(right)) => Some(&left & &right),
                (Some(mask), None) | (None, Some(mask)) => Some(mask),
                (None, None) => None,
            };
            Ok(mask)
        }
        Node::Or(left, right) => {
            let mask = match (evaluate(left, batch)?, evaluate(right, batch)?) {
                (Some(left), Some(right)) => Some(&left | &right),
                _ => None,
            };
            Ok(mask)
        }
        Node::Leaf(leaf) => match batch.column_by_name(leaf.column()) {
            Some(array) => evaluate_leaf(&leaf, array.as_ref()).map(Some),
            None => Ok(None),
        },
    }
}

/// Evaluate a single-column constraint against every entry of `array`.
///
/// Dictionary arrays are evaluated once over their values and the result is
/// mapped through the keys.
pub(crate) fn evaluate_leaf(leaf: &Leaf<'_>, array: &dyn Array) -> Result<BooleanBuffer> {
    if let Some(dictionary) = array.as_any_dictionary_opt() {
        let value_mask = evaluate_leaf(leaf, dictionary.values().as_ref())?;
        let null_matches = matches!(leaf, Leaf::InSet { values, .. } if values.includes_null());
        let keys = dictionary.keys();
        let normalized = dictionary.normalized_keys();
        return Ok(BooleanBuffer::collect_bool(keys.len(), |i| {
            if keys.is_valid(i) {
                value_mask.value(normalized[i])
            } else {
                null_matches
            }
        }));
    }

    let (operation, mask) = match *leaf {
        Leaf::Equality { value, .. } => (
            "Integer equality filter",
            integer_mask(array, |v| v.eq_bound(value)),
        ),
        Leaf::Range { start, end, .. } => (
            "Integer range filter",
            integer_mask(array, |v| v.in_range(start, end)),
        ),
        Leaf::InSet { values, .. } => ("String set filter", string_set_mask(array, values)),
        Leaf::DateRange { start, end, .. } => {
            ("Date range filter", date_range_mask(array, start, end))
        }
    };
    mask.ok_or_else(|| TrellisError::UnsupportedType {
        operation,
        column: leaf.column().to_string(),
        data_type: array.data_type().clone(),
    })
}

fn primitive_mask<T>(array: &PrimitiveArray<T>, matches: impl Fn(Widened) -> bool) -> BooleanBuffer
where
    T: ArrowPrimitiveType,
    T::Native: FilterInt,
{
    BooleanBuffer::collect_bool(array.len(), |i| {
        array.is_valid(i) && matches(array.value(i).widen())
    })
}

/// `None` when `array` is not an integer array.
fn integer_mask(array: &dyn Array, matches: impl Fn(Widened) -> bool) -> Option<BooleanBuffer> {
    let mask = match array.data_type() {
        DataType::Int8 => primitive_mask(array.as_primitive::<Int8Type>(), matches),
        DataType::Int16 => primitive_mask(array.as_primitive::<Int16Type>(), matches),
        DataType::Int32 => primitive_mask(array.as_primitive::<Int32Type>(), matches),
        DataType::Int64 => primitive_mask(array.as_primitive::<Int64Type>(), matches),
        DataType::UInt8 => primitive_mask(array.as_primitive::<UInt8Type>(), matches),
        DataType::UInt16 => primitive_mask(array.as_primitive::<UInt16Type>(), matches),
        DataType::UInt32 => primitive_mask(array.as_primitive::<UInt32Type>(), matches),
        DataType::UInt64 => primitive_mask(array.as_primitive::<UInt64Type>(), matches),
        _ => return None,
    };
    Some(mask)
}

fn string_set_mask(array: &dyn Array, set: &StringSet) -> Option<BooleanBuffer> {
    let len = array.len();
    let mask = match array.data_type() {
        DataType::Utf8 => {
            let array = array.as_string::<i32>();
            BooleanBuffer::collect_bool(len, |i| {
                set.contains(array.is_valid(i).then(|| array.value(i)))
            })
        }
        DataType::LargeUtf8 => {
            let array = array.as_string::<i64>();
            BooleanBuffer::collect_bool(len, |i| {
                set.contains(array.is_valid(i).then(|| array.value(i)))
            })
        }
        DataType::Utf8View => {
            let array = array.as_string_view();
            BooleanBuffer::collect_bool(len, |i| {
                set.contains(array.is_valid(i).then(|| array.value(i)))
            })
        }
        _ => return None,
    };
    Some(mask)
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

fn date_range_mask(array: &dyn Array, start: NaiveDate, end: NaiveDate) -> Option<BooleanBuffer> {
    let start = days_since_epoch(start);
    let end = days_since_epoch(end);
    let in_range = |days: i64| days >= start && days <= end;
    let mask = match array.data_type() {
        DataType::Date32 => {
            let array = array.as_primitive::<Date32Type>();
            BooleanBuffer::collect_bool(array.len(), |i| {
                array.is_valid(i) && in_range(i64::from(array.value(i)))
            })
        }
        DataType::Date64 => {
            let array = array.as_primitive::<Date64Type>();
            BooleanBuffer::collect_bool(array.len(), |i| {
                array.is_valid(i) && in_range(array.value(i).div_euclid(MILLISECONDS_IN_DAY))
            })
        }
        _ => return None,
    };
    Some(mask)
}
