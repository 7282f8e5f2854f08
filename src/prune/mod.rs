//! Row-group pruning from Parquet column statistics.
//!
//! ```text
//! RowGroupSelector::required_row_groups
//!     ├─> context::build_column_lookup   (predicate column -> leaf index)
//!     ├─> stats::ColumnStatistics        (physical -> logical min/max)
//!     └─> eval::include_row_group        (predicate tree over min/max)
//! ```

mod context;
mod eval;
mod selector;
mod stats;

pub(crate) use eval::include_row_group;
pub use selector::RowGroupSelector;
pub use stats::{ColumnStatistics, MinMax};
