use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, SchemaRef};

use super::{PartitionInformation, Partitioning, PartitioningFactory, scalar::parse_scalar};
use crate::{
    error::{Result, TrellisError},
    options::DatasetOptions,
    schema::types_match,
};

/// Decode a URL-encoded path segment.
///
/// `+` is a space. Percent escapes that do not form valid UTF-8 become
/// replacement characters.
fn decode(text: &str) -> String {
    let text = text.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(text.as_bytes())).into_owned()
}

/// Split a `key=value` directory name and decode both halves.
///
/// Only the first `=` separates key from value, so values may contain `=`.
fn split_component(component: &str) -> Result<(String, String)> {
    let (key, value) = component
        .split_once('=')
        .ok_or_else(|| TrellisError::InvalidPartitionPath {
            component: component.to_string(),
        })?;
    Ok((decode(key), decode(value)))
}

/// Hive-style `key=value` directory partitioning.
#[derive(Clone, Debug)]
pub struct HivePartitioning {
    schema: SchemaRef,
    null_fallback: String,
}

impl HivePartitioning {
    pub fn new(schema: SchemaRef) -> Self {
        Self::with_options(schema, &DatasetOptions::default())
    }

    pub fn with_options(schema: SchemaRef, options: &DatasetOptions) -> Self {
        Self {
            schema,
            null_fallback: options.hive_null_fallback().to_string(),
        }
    }
}

impl Partitioning for HivePartitioning {
    fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Parse `key=value` components into partition values.
    ///
    /// Keys must name a field of the partitioning schema. The null fallback
    /// value yields a null, which is rejected for non-nullable fields. Fields
    /// appear in the result in the order of the components.
    fn parse(&self, components: &[&str]) -> Result<PartitionInformation> {
        let mut fields = Vec::with_capacity(components.len());
        let mut columns = Vec::with_capacity(components.len());
        for component in components {
            let (key, value) = split_component(component)?;
            let field = self.schema.field_with_name(&key).map_err(|_| {
                TrellisError::UnknownPartitionField {
                    field: key.to_string(),
                }
            })?;
            if fields.iter().any(|f: &Field| f.name() == field.name()) {
                return Err(TrellisError::DuplicateField { field: key });
            }
            let value = if value == self.null_fallback {
                if !field.is_nullable() {
                    return Err(TrellisError::NullForNonNullableField { field: key });
                }
                None
            } else {
                Some(value)
            };
            columns.push(parse_scalar(field, value.as_deref())?);
            fields.push(field.clone());
        }

        let info = PartitionInformation::from_columns(Arc::new(Schema::new(fields)), columns)?;
        tracing::trace!(
            path = %components.join("/"),
            fields = info.batch().num_columns(),
            "parsed hive partition path"
        );
        Ok(info)
    }
}

/// Discovers Hive partition fields from the directory layout of a dataset.
///
/// Fields are recorded in order of first appearance. A field is typed
/// `Int64` when every non-null value seen for it parses as an `i64`, and
/// `Utf8` otherwise. All inferred fields are nullable.
#[derive(Clone, Debug, Default)]
pub struct HivePartitioningFactory {
    options: DatasetOptions,
    fields: Vec<InferredField>,
}

#[derive(Clone, Debug)]
struct InferredField {
    name: String,
    non_null_values: usize,
    all_integers: bool,
}

impl InferredField {
    fn data_type(&self) -> DataType {
        if self.non_null_values > 0 && self.all_integers {
            DataType::Int64
        } else {
            DataType::Utf8
        }
    }
}

impl HivePartitioningFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DatasetOptions) -> Self {
        Self {
            options,
            fields: Vec::new(),
        }
    }

    /// Schema inferred from the components inspected so far.
    pub fn inferred_schema(&self) -> Schema {
        Schema::new(
            self.fields
                .iter()
                .map(|field| Field::new(field.name.clone(), field.data_type(), true))
                .collect::<Vec<_>>(),
        )
    }
}

impl PartitioningFactory for HivePartitioningFactory {
    fn inspect(&mut self, components: &[&str]) -> Result<()> {
        for component in components {
            let (key, value) = split_component(component)?;
            let idx = match self.fields.iter().position(|field| field.name == key) {
                Some(idx) => idx,
                None => {
                    self.fields.push(InferredField {
                        name: key,
                        non_null_values: 0,
                        all_integers: true,
                    });
                    self.fields.len() - 1
                }
            };
            if value != self.options.hive_null_fallback() {
                let field = &mut self.fields[idx];
                field.non_null_values += 1;
                field.all_integers &= value.parse::<i64>().is_ok();
            }
        }
        Ok(())
    }

    fn build(&self, schema: Option<&Schema>) -> Result<Box<dyn Partitioning>> {
        let inferred = self.inferred_schema();
        let schema = match schema {
            None => inferred,
            Some(explicit) => {
                let mut fields = Vec::with_capacity(inferred.fields().len());
                for field in inferred.fields() {
                    let declared = explicit.field_with_name(field.name()).map_err(|_| {
                        TrellisError::MissingPartitionField {
                            field: field.name().clone(),
                        }
                    })?;
                    if !types_match(field.data_type(), declared.data_type()) {
                        return Err(TrellisError::PartitionTypeMismatch {
                            field: field.name().clone(),
                            expected: field.data_type().clone(),
                            actual: declared.data_type().clone(),
                        });
                    }
                    fields.push(declared.clone());
                }
                Schema::new(fields)
            }
        };
        tracing::debug!(fields = schema.fields().len(), "built hive partitioning");
        Ok(Box::new(HivePartitioning::with_options(
            Arc::new(schema),
            &self.options,
        )))
    }
}
