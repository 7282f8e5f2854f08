use std::collections::HashMap;

use arrow::array::RecordBatch;
use chrono::NaiveDate;
use parquet::file::metadata::ParquetMetaData;

use crate::{
    error::Result,
    expr::{Node, Predicate, StringSet},
    mask::{FilterMask, compute_mask, evaluate_leaf},
    partition::PartitionInformation,
    prune::{ColumnStatistics, RowGroupSelector, include_row_group},
};

/// Value accepted by [`FilterBuilder::with_equality`].
///
/// Integers become an integer equality constraint; strings become a
/// single-member set constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EqualityValue {
    Int(i64),
    Str(String),
}

macro_rules! impl_equality_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for EqualityValue {
                fn from(value: $t) -> Self {
                    EqualityValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_equality_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for EqualityValue {
    fn from(value: &str) -> Self {
        EqualityValue::Str(value.to_string())
    }
}

impl From<String> for EqualityValue {
    fn from(value: String) -> Self {
        EqualityValue::Str(value)
    }
}

impl Predicate {
    /// Whether a partition with these values may contain matching rows.
    ///
    /// A leaf on a column absent from the partition information does not
    /// exclude the partition.
    pub fn include_partition(&self, partition: &PartitionInformation) -> Result<bool> {
        match self.node() {
            Node::And(left, right) => {
                Ok(left.include_partition(partition)? && right.include_partition(partition)?)
            }
            Node::Or(left, right) => {
                Ok(left.include_partition(partition)? || right.include_partition(partition)?)
            }
            Node::Leaf(leaf) => match partition.column(leaf.column()) {
                Some(array) => {
                    let mask = evaluate_leaf(&leaf, array.as_ref())?;
                    Ok(!mask.is_empty() && mask.value(0))
                }
                None => Ok(true),
            },
        }
    }

    /// Whether a row group with these statistics may contain matching rows.
    pub fn include_row_group(&self, stats: &HashMap<String, ColumnStatistics>) -> bool {
        include_row_group(self, stats)
    }

    /// Compute the rows of `batch` matching this predicate.
    ///
    /// `None` means the predicate cannot filter this batch and all rows
    /// should be kept.
    pub fn compute_mask(&self, batch: &RecordBatch) -> Result<Option<FilterMask>> {
        compute_mask(self, batch)
    }
}

/// A conjunction of predicates built with [`FilterBuilder`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Create a new builder for Filter
    ///
    /// # Example
    /// ```
    /// use trellis::Filter;
    ///
    /// let filter = Filter::builder()
    ///     .with_equality("year", 2024)
    ///     .with_in_set("city", ["Paris", "Lyon"])
    ///     .with_range("id", 15, 25)
    ///     .build();
    /// assert_eq!(filter.columns(), vec!["year", "city", "id"]);
    /// ```
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// All constraints folded into a single `And` tree, `None` when empty.
    pub fn predicate(&self) -> Option<Predicate> {
        self.predicates
            .iter()
            .cloned()
            .reduce(|acc, predicate| acc.and(predicate))
    }

    /// Columns referenced by any constraint, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        for predicate in &self.predicates {
            predicate.collect_columns(&mut columns);
        }
        columns
    }

    /// Whether the partition may contain matching rows.
    pub fn include_partition(&self, partition: &PartitionInformation) -> Result<bool> {
        for predicate in &self.predicates {
            if !predicate.include_partition(partition)? {
                tracing::debug!(
                    predicate = %predicate,
                    partition = ?partition.batch(),
                    "partition pruned"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Row groups of a Parquet file that may contain matching rows.
    ///
    /// See [`RowGroupSelector::required_row_groups`].
    pub fn required_row_groups(&self, metadata: &ParquetMetaData) -> Option<Vec<usize>> {
        let predicate = self.predicate()?;
        RowGroupSelector::new(&predicate).required_row_groups(metadata)
    }

    /// Rows of `batch` matching every constraint that applies to it.
    pub fn compute_mask(&self, batch: &RecordBatch) -> Result<Option<FilterMask>> {
        match self.predicate() {
            Some(predicate) => predicate.compute_mask(batch),
            None => Ok(None),
        }
    }
}

/// Builder for Filter
///
/// Each call adds one constraint; all constraints must hold.
#[derive(Clone, Debug, Default)]
pub struct FilterBuilder {
    predicates: Vec<Predicate>,
}

impl FilterBuilder {
    /// Require `column` to equal `value`.
    ///
    /// A string value is a set constraint with one member.
    pub fn with_equality(
        mut self,
        column: impl Into<String>,
        value: impl Into<EqualityValue>,
    ) -> Self {
        let predicate = match value.into() {
            EqualityValue::Int(value) => Predicate::eq(column, value),
            EqualityValue::Str(value) => Predicate::in_set(column, [value].into_iter().collect()),
        };
        self.predicates.push(predicate);
        self
    }

    /// Require `column` to lie within `[start, end]`.
    pub fn with_range(mut self, column: impl Into<String>, start: i64, end: i64) -> Self {
        self.predicates.push(Predicate::range(column, start, end));
        self
    }

    /// Require `column` to be one of `values`.
    ///
    /// Values may be `&str`, `String` or an `Option` of either; `None` makes
    /// null a member.
    pub fn with_in_set<I>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        StringSet: FromIterator<I::Item>,
    {
        self.predicates.push(Predicate::in_set(column, values.into_iter().collect()));
        self
    }

    /// Require a date column to lie within `[start, end]`.
    pub fn with_date_range(
        mut self,
        column: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        self.predicates.push(Predicate::date_range(column, start, end));
        self
    }

    /// Add an arbitrary predicate, e.g. an `Or` of other constraints.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Build the Filter
    pub fn build(self) -> Filter {
        Filter {
            predicates: self.predicates,
        }
    }
}
