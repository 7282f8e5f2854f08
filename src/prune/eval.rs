use std::collections::HashMap;

use super::stats::ColumnStatistics;
use crate::{
    cmp::{bounds_contain, bounds_overlap},
    expr::Predicate,
};

/// Whether a row group can contain rows matching `predicate`.
///
/// Columns without an entry in `stats`, and statistics without integer
/// semantics, are treated as "may match".
pub(crate) fn include_row_group(
    predicate: &Predicate,
    stats: &HashMap<String, ColumnStatistics>,
) -> bool {
    match predicate {
        Predicate::Equality { column, value } => {
            match stats.get(column).and_then(ColumnStatistics::integer_bounds) {
                Some(bounds) => bounds_contain(bounds.min, bounds.max, *value),
                None => true,
            }
        }
        Predicate::Range { column, start, end } => {
            match stats.get(column).and_then(ColumnStatistics::integer_bounds) {
                Some(bounds) => bounds_overlap(bounds.min, bounds.max, *start, *end),
                None => true,
            }
        }
        Predicate::InSet { .. } | Predicate::DateRange { .. } => true,
        Predicate::And(left, right) => {
            include_row_group(left, stats) && include_row_group(right, stats)
        }
        Predicate::Or(left, right) => {
            include_row_group(left, stats) || include_row_group(right, stats)
        }
    }
}
