use std::collections::HashMap;

use tabrec_model::{FieldDescriptor, RawCell, Row, Schema};

/// Case-insensitive lookup of fields by name for one result set.
///
/// Built once per result set and shared by every row. Folding is ASCII-only,
/// the same as [`Schema::position_of`]. When two fields share a folded name
/// the last declared one wins.
#[derive(Debug, Clone)]
pub struct SchemaIndex<'a> {
    schema: &'a Schema,
    positions: HashMap<String, usize>,
}

impl<'a> SchemaIndex<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let positions = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(position, field)| (field.name().to_ascii_lowercase(), position))
            .collect();
        Self { schema, positions }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn field(&self, name: &str) -> Option<(usize, &'a FieldDescriptor)> {
        let position = *self.positions.get(&name.to_ascii_lowercase())?;
        self.schema
            .fields()
            .get(position)
            .map(|field| (position, field))
    }

    /// The field named `name` and its cell in `row`, if both exist.
    pub fn cell<'r>(&self, row: &'r Row, name: &str) -> Option<(&'a FieldDescriptor, &'r RawCell)> {
        let (position, field) = self.field(name)?;
        row.get(position).map(|cell| (field, cell))
    }
}
