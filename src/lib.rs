//! Partition, row-group and row-level pruning for partitioned Parquet datasets.
//!
//! A [`Filter`] is checked at three levels:
//!
//! 1. [`Filter::include_partition`] against the values parsed from a file's
//!    directory path by a [`Partitioning`] scheme, before the file is opened;
//! 2. [`Filter::required_row_groups`] against the column statistics in the
//!    file's [`ParquetMetaData`](parquet::file::metadata::ParquetMetaData);
//! 3. [`Filter::compute_mask`] against decoded record batches, producing a
//!    [`FilterMask`] that [`apply_mask`] uses to drop excluded rows.

mod cmp;
mod error;
mod expr;
mod filter;
mod mask;
mod options;
mod partition;
mod prune;
mod schema;

pub use cmp::{FilterInt, Widened};
pub use error::{Result, TrellisError};
pub use expr::{Predicate, StringSet};
pub use filter::{EqualityValue, Filter, FilterBuilder};
pub use mask::{FilterMask, apply_mask, apply_mask_to_batch};
pub use options::{DEFAULT_HIVE_NULL_FALLBACK, DatasetOptions, DatasetOptionsBuilder};
pub use partition::{
    HivePartitioning, HivePartitioningFactory, NoPartitioning, NoPartitioningFactory,
    PartitionInformation, Partitioning, PartitioningFactory, expand_batch, parse_scalar,
};
pub use prune::{ColumnStatistics, MinMax, RowGroupSelector};
pub use schema::{fields_match, merge_schemas, types_match};
