use std::collections::HashMap;

use parquet::file::metadata::ParquetMetaData;

use super::{context::build_column_lookup, eval::include_row_group, stats::ColumnStatistics};
use crate::expr::Predicate;

/// Selects the row groups of a Parquet file that may contain matching rows.
#[derive(Clone, Copy, Debug)]
pub struct RowGroupSelector<'a> {
    predicate: &'a Predicate,
}

impl<'a> RowGroupSelector<'a> {
    pub fn new(predicate: &'a Predicate) -> Self {
        Self { predicate }
    }

    /// Indices of the row groups that must be read, in file order.
    ///
    /// Returns `None` when none of the predicate's columns is a leaf column
    /// of the file, meaning the predicate cannot prune this file at all.
    /// This is distinct from `Some` holding every index.
    pub fn required_row_groups(&self, metadata: &ParquetMetaData) -> Option<Vec<usize>> {
        let schema = metadata.file_metadata().schema_descr();
        let lookup = build_column_lookup(schema);
        let columns: Vec<(&str, usize)> = self
            .predicate
            .columns()
            .into_iter()
            .filter_map(|column| lookup.get(column).map(|idx| (column, *idx)))
            .collect();
        if columns.is_empty() {
            tracing::debug!(
                predicate = %self.predicate,
                "no predicate column found in file, row groups not pruned"
            );
            return None;
        }

        let mut required = Vec::with_capacity(metadata.num_row_groups());
        for (row_group_idx, row_group) in metadata.row_groups().iter().enumerate() {
            let stats: HashMap<String, ColumnStatistics> = columns
                .iter()
                .filter_map(|(column, idx)| {
                    let chunk = row_group.column(*idx);
                    let stats =
                        ColumnStatistics::from_parquet(chunk.statistics()?, chunk.column_descr())?;
                    Some((column.to_string(), stats))
                })
                .collect();
            if include_row_group(self.predicate, &stats) {
                required.push(row_group_idx);
            } else {
                tracing::trace!(row_group = row_group_idx, "row group pruned by statistics");
            }
        }

        tracing::debug!(
            predicate = %self.predicate,
            retained = required.len(),
            total = metadata.num_row_groups(),
            "row group selection"
        );
        Some(required)
    }
}
