//! Partitioning schemes that turn the directory components of a data file's
//! path into typed partition values.

mod expand;
mod hive;
mod scalar;

use std::sync::Arc;

use arrow::{
    array::{ArrayRef, RecordBatch},
    record_batch::RecordBatchOptions,
};
use arrow_schema::{ArrowError, Schema, SchemaRef};

pub use expand::expand_batch;
pub use hive::{HivePartitioning, HivePartitioningFactory};
pub use scalar::parse_scalar;

use crate::error::{Result, TrellisError};

/// Partition values parsed from a path prefix.
///
/// Holds a single-row record batch whose fields are the subset of the
/// partitioning schema found in the path, in the order they were found.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionInformation {
    batch: RecordBatch,
}

impl PartitionInformation {
    /// Wrap a single-row record batch.
    pub fn new(batch: RecordBatch) -> Result<Self> {
        if batch.num_rows() != 1 {
            return Err(ArrowError::InvalidArgumentError(format!(
                "partition information must hold exactly one row, got {}",
                batch.num_rows()
            ))
            .into());
        }
        Ok(Self { batch })
    }

    /// Partition information without any field.
    pub fn empty() -> Result<Self> {
        Self::from_columns(Arc::new(Schema::empty()), vec![])
    }

    /// Assemble partition information from single-value columns.
    pub fn from_columns(schema: SchemaRef, columns: Vec<ArrayRef>) -> Result<Self> {
        let options = RecordBatchOptions::new().with_row_count(Some(1));
        let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// The single-value array of partition field `name`, if it was in the path.
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_columns() == 0
    }
}

/// A scheme mapping directory components to partition values.
pub trait Partitioning: Send + Sync {
    /// Schema of every partition field this scheme can produce.
    fn schema(&self) -> &SchemaRef;

    /// Parse the directory components between the dataset root and a file.
    fn parse(&self, components: &[&str]) -> Result<PartitionInformation>;
}

/// Builds a [`Partitioning`] after inspecting the directories of a dataset.
pub trait PartitioningFactory {
    /// Record the directory components leading to one data file.
    fn inspect(&mut self, components: &[&str]) -> Result<()>;

    /// Build the scheme, validated against `schema` when one is given.
    fn build(&self, schema: Option<&Schema>) -> Result<Box<dyn Partitioning>>;
}

/// A dataset whose directory layout carries no partition values.
#[derive(Clone, Debug)]
pub struct NoPartitioning {
    schema: SchemaRef,
}

impl NoPartitioning {
    pub fn new() -> Self {
        Self {
            schema: Arc::new(Schema::empty()),
        }
    }
}

impl Default for NoPartitioning {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioning for NoPartitioning {
    fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    fn parse(&self, _components: &[&str]) -> Result<PartitionInformation> {
        PartitionInformation::empty()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoPartitioningFactory;

impl PartitioningFactory for NoPartitioningFactory {
    fn inspect(&mut self, _components: &[&str]) -> Result<()> {
        Ok(())
    }

    fn build(&self, schema: Option<&Schema>) -> Result<Box<dyn Partitioning>> {
        if schema.is_some_and(|schema| !schema.fields().is_empty()) {
            return Err(TrellisError::UnexpectedPartitionSchema);
        }
        Ok(Box::new(NoPartitioning::new()))
    }
}
