use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

/// Errors raised while parsing partition paths, validating schemas or
/// evaluating filters.
///
/// Pruning decisions that simply cannot be made (missing statistics, a
/// predicate on a column the data does not contain) are never errors; they
/// resolve to "include" instead.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// A directory name does not have the `key=value` shape
    #[error("Invalid directory name for Hive partitioning '{component}'")]
    InvalidPartitionPath {
        /// The offending path component, as found on disk
        component: String,
    },

    /// A directory key does not name a field of the partitioning schema
    #[error("Invalid field name '{field}' for partitioning")]
    UnknownPartitionField {
        /// The decoded key
        field: String,
    },

    /// The null sentinel was found for a field declared non-nullable
    #[error("Found null value for non-nullable partition field '{field}'")]
    NullForNonNullableField {
        /// Name of the partition field
        field: String,
    },

    /// A partition value could not be parsed as the field's declared type
    #[error("Cannot parse '{value}' as {data_type} for partition field '{field}': {reason}")]
    InvalidPartitionValue {
        /// Name of the partition field
        field: String,
        /// The decoded directory value
        value: String,
        /// Declared type of the field
        data_type: DataType,
        /// Reason reported by the parser
        reason: String,
    },

    /// An explicit schema disagrees with the type inferred from the directory tree
    #[error("Partition field '{field}' has type {actual} but the partitioning expects {expected}")]
    PartitionTypeMismatch {
        /// Name of the partition field
        field: String,
        /// Type inferred from the partitioning
        expected: DataType,
        /// Type found in the explicit schema
        actual: DataType,
    },

    /// A partition field found in the directory tree is missing from the explicit schema
    #[error("Partition field '{field}' is not present in the dataset schema")]
    MissingPartitionField {
        /// Name of the partition field
        field: String,
    },

    /// A non-empty schema was supplied for a dataset without partitioning
    #[error("Expected an empty partition schema when using no partitioning")]
    UnexpectedPartitionSchema,

    /// The same column name appears in both the partition and the data file schema
    #[error("Duplicate field name '{field}' found in partition schema and data file schema")]
    DuplicateField {
        /// The duplicated field name
        field: String,
    },

    /// An operation has no defined semantics for the array type it was given
    #[error("{operation} for column '{column}' does not support arrays with type {data_type}")]
    UnsupportedType {
        /// What was being attempted, e.g. "Integer equality filter"
        operation: &'static str,
        /// Column the operation was applied to (empty when not column-bound)
        column: String,
        /// The unsupported type
        data_type: DataType,
    },

    /// A filter mask was applied to an array of a different length
    #[error("Filter mask covers {mask} rows but the array has {array} rows")]
    MaskLength {
        /// Number of rows described by the mask
        mask: usize,
        /// Length of the array being filtered
        array: usize,
    },

    /// An arrow kernel failed while building or filtering arrays
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

pub type Result<T> = std::result::Result<T, TrellisError>;
