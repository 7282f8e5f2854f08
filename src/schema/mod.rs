//! Schema comparison and merging of partition and data file schemas.

mod compare;

use arrow_schema::{Field, Schema};

pub use compare::{fields_match, types_match};

use crate::error::{Result, TrellisError};

/// Concatenate the data file fields after the partition fields.
///
/// A name present in both schemas is rejected instead of shadowed.
pub fn merge_schemas(partition: &Schema, data: &Schema) -> Result<Schema> {
    let mut fields: Vec<Field> = Vec::with_capacity(partition.fields().len() + data.fields().len());
    for field in partition.fields().iter().chain(data.fields().iter()) {
        if fields.iter().any(|existing| existing.name() == field.name()) {
            return Err(TrellisError::DuplicateField {
                field: field.name().clone(),
            });
        }
        fields.push(field.as_ref().clone());
    }
    Ok(Schema::new(fields))
}

#[cfg(test)]
mod tests {
    use arrow_schema::DataType;

    use super::*;

    #[test]
    fn partition_fields_come_first() {
        let partition = Schema::new(vec![Field::new("year", DataType::Int64, true)]);
        let data = Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]);
        let merged = merge_schemas(&partition, &data).unwrap();
        let names: Vec<_> = merged.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["year", "id", "name"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let partition = Schema::new(vec![Field::new("id", DataType::Int64, true)]);
        let data = Schema::new(vec![Field::new("id", DataType::Int64, true)]);
        let err = merge_schemas(&partition, &data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate field name 'id' found in partition schema and data file schema"
        );
    }
}
