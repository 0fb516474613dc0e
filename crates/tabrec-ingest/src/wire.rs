//! Warehouse REST JSON shapes.
//!
//! Schemas arrive as `{"fields": [{"name", "type", "mode", "fields"}]}` and
//! rows as `{"f": [{"v": ...}]}`, where `v` is a string, `null`, a nested
//! `{"f": [...]}` record, or an array of `{"v": ...}` elements.

use serde::{Deserialize, Serialize};
use tabrec_model::{FieldDescriptor, NativeScalar, RawCell, Row, Schema, TypeTag};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSchema {
    #[serde(default)]
    pub fields: Vec<WireField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub fields: Vec<WireField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireRow {
    #[serde(default)]
    pub f: Vec<WireCell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireCell {
    #[serde(default)]
    pub v: serde_json::Value,
}

impl WireField {
    fn is_repeated(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|mode| mode.eq_ignore_ascii_case("REPEATED"))
    }

    /// Convert into a field descriptor. `REPEATED` mode wraps the declared
    /// type into an array tag.
    pub fn to_descriptor(&self) -> Result<FieldDescriptor> {
        let declared: TypeTag = match self.type_name.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        };
        let type_tag = if self.is_repeated() && !matches!(declared, TypeTag::Array(_)) {
            TypeTag::array_of(declared)
        } else {
            declared
        };
        let sub_fields = self
            .fields
            .iter()
            .map(WireField::to_descriptor)
            .collect::<Result<Vec<_>>>()?;
        FieldDescriptor::new(self.name.clone(), type_tag, sub_fields)
            .map_err(|source| IngestError::Schema { source })
    }
}

impl WireSchema {
    pub fn to_schema(&self) -> Result<Schema> {
        let fields = self
            .fields
            .iter()
            .map(WireField::to_descriptor)
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema::new(fields))
    }
}

impl WireRow {
    pub fn to_row(&self) -> Row {
        Row::new(self.f.iter().map(|cell| cell_from_json(&cell.v)).collect())
    }
}

/// Convert one wire value into a raw cell, preserving its shape.
///
/// Strings stay raw text. Bare JSON numbers and booleans, which hand-written
/// snapshots often use, become native scalars that keep their text form.
/// Objects other than `{"f": [...]}` are kept as their JSON text.
pub fn cell_from_json(value: &serde_json::Value) -> RawCell {
    match value {
        serde_json::Value::Null => RawCell::Null,
        serde_json::Value::String(text) => RawCell::text(text.clone()),
        serde_json::Value::Bool(flag) => RawCell::Primitive {
            native: Some(NativeScalar::Bool(*flag)),
            text: Some(flag.to_string()),
        },
        serde_json::Value::Number(number) => {
            let native = match number.as_i64() {
                Some(int) => Some(NativeScalar::Int64(int)),
                None => number.as_f64().map(NativeScalar::Float64),
            };
            RawCell::Primitive {
                native,
                text: Some(number.to_string()),
            }
        }
        serde_json::Value::Array(elements) => {
            RawCell::Repeated(elements.iter().map(unwrap_element).collect())
        }
        serde_json::Value::Object(map) => match map.get("f") {
            Some(serde_json::Value::Array(children)) if map.len() == 1 => {
                RawCell::Record(children.iter().map(unwrap_element).collect())
            }
            _ => RawCell::text(value.to_string()),
        },
    }
}

fn unwrap_element(element: &serde_json::Value) -> RawCell {
    match element {
        serde_json::Value::Object(map) if map.len() == 1 && map.contains_key("v") => {
            cell_from_json(&map["v"])
        }
        other => cell_from_json(other),
    }
}
