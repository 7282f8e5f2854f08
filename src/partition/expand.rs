use std::sync::Arc;

use arrow::{
    array::{ArrayRef, RecordBatch, UInt32Array, new_null_array},
    compute::take,
    record_batch::RecordBatchOptions,
};
use arrow_schema::Schema;

use super::PartitionInformation;
use crate::error::Result;

/// Lay out `batch` according to `dataset_schema`, filling partition columns.
///
/// Columns present in the file are taken from `batch`. Partition columns are
/// broadcast from `partition` to the batch length. Columns found in neither
/// (a partition field absent from this path) become all-null.
pub fn expand_batch(
    batch: &RecordBatch,
    partition: &PartitionInformation,
    dataset_schema: &Schema,
) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let broadcast = UInt32Array::from(vec![0u32; rows]);
    let columns = dataset_schema
        .fields()
        .iter()
        .map(|field| {
            if let Some(column) = batch.column_by_name(field.name()) {
                return Ok(Arc::clone(column));
            }
            match partition.column(field.name()) {
                Some(value) => Ok(take(value.as_ref(), &broadcast, None)?),
                None => Ok(new_null_array(field.data_type(), rows)),
            }
        })
        .collect::<Result<Vec<ArrayRef>>>()?;
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(dataset_schema.clone()),
        columns,
        &options,
    )?)
}
