use std::collections::HashMap;

use parquet::schema::types::SchemaDescriptor;

/// Map column names to leaf indices.
///
/// Every leaf is reachable by its full dotted path. A leaf is also reachable
/// by its bare name when no other leaf shares that name.
pub(crate) fn build_column_lookup(schema: &SchemaDescriptor) -> HashMap<String, usize> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for column in schema.columns() {
        *name_counts.entry(column.name()).or_insert(0) += 1;
    }

    let mut lookup = HashMap::with_capacity(schema.num_columns());
    for (idx, column) in schema.columns().iter().enumerate() {
        lookup.insert(column.path().string(), idx);
    }
    for (idx, column) in schema.columns().iter().enumerate() {
        let name = column.name();
        if name_counts.get(name).copied() == Some(1) {
            lookup.entry(name.to_string()).or_insert(idx);
        }
    }
    lookup
}
