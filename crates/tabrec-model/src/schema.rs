//! Field descriptors supplied by the query executor alongside each result set.

use std::fmt;
use std::str::FromStr;

use crate::{ModelError, Result};

/// Declared kind of the values a field holds.
///
/// The tag set is fixed by the warehouse's schema vocabulary. `Array` carries
/// the element tag; element sub-fields (for arrays of records) live on the
/// owning [`FieldDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int64,
    Float64,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    Datetime,
    Timestamp,
    Json,
    Geography,
    Struct,
    Array(Box<TypeTag>),
    /// Reserved or future tag, kept verbatim for diagnostics.
    Other(String),
}

impl TypeTag {
    /// Shorthand for `Array(Box::new(element))`.
    pub fn array_of(element: TypeTag) -> Self {
        TypeTag::Array(Box::new(element))
    }

    /// Returns true for `Struct` and `Array(Struct)`, the only tags that carry sub-fields.
    pub fn is_nested_record(&self) -> bool {
        match self {
            TypeTag::Struct => true,
            TypeTag::Array(element) => matches!(element.as_ref(), TypeTag::Struct),
            _ => false,
        }
    }

    /// Returns the canonical upper-case tag name.
    pub fn name(&self) -> String {
        match self {
            TypeTag::Bool => "BOOL".to_string(),
            TypeTag::Int64 => "INT64".to_string(),
            TypeTag::Float64 => "FLOAT64".to_string(),
            TypeTag::Decimal => "NUMERIC".to_string(),
            TypeTag::String => "STRING".to_string(),
            TypeTag::Bytes => "BYTES".to_string(),
            TypeTag::Date => "DATE".to_string(),
            TypeTag::Time => "TIME".to_string(),
            TypeTag::Datetime => "DATETIME".to_string(),
            TypeTag::Timestamp => "TIMESTAMP".to_string(),
            TypeTag::Json => "JSON".to_string(),
            TypeTag::Geography => "GEOGRAPHY".to_string(),
            TypeTag::Struct => "STRUCT".to_string(),
            TypeTag::Array(element) => format!("ARRAY<{}>", element.name()),
            TypeTag::Other(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for TypeTag {
    type Err = std::convert::Infallible;

    /// Parse a warehouse type name, accepting both standard SQL and legacy
    /// aliases. Unrecognized names become [`TypeTag::Other`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if let Some(inner) = normalized
            .strip_prefix("ARRAY<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            let element = TypeTag::from_str(inner)?;
            return Ok(TypeTag::array_of(element));
        }
        let tag = match normalized.as_str() {
            "BOOL" | "BOOLEAN" => TypeTag::Bool,
            "INT64" | "INTEGER" | "INT" => TypeTag::Int64,
            "FLOAT64" | "FLOAT" => TypeTag::Float64,
            "NUMERIC" | "BIGNUMERIC" | "DECIMAL" | "BIGDECIMAL" => TypeTag::Decimal,
            "STRING" => TypeTag::String,
            "BYTES" => TypeTag::Bytes,
            "DATE" => TypeTag::Date,
            "TIME" => TypeTag::Time,
            "DATETIME" => TypeTag::Datetime,
            "TIMESTAMP" => TypeTag::Timestamp,
            "JSON" => TypeTag::Json,
            "GEOGRAPHY" => TypeTag::Geography,
            "STRUCT" | "RECORD" => TypeTag::Struct,
            _ => TypeTag::Other(s.trim().to_string()),
        };
        Ok(tag)
    }
}

/// Schema metadata for one column: name, declared tag and nested sub-fields.
///
/// `sub_fields` is non-empty exactly when the tag is `Struct` or `Array(Struct)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    type_tag: TypeTag,
    sub_fields: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    /// Build a descriptor. Record tags need at least one sub-field and every
    /// other tag must declare none.
    pub fn new(
        name: impl Into<String>,
        type_tag: TypeTag,
        sub_fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let name = name.into();
        if type_tag.is_nested_record() == sub_fields.is_empty() {
            let message = if sub_fields.is_empty() {
                format!("type {type_tag} requires at least one sub-field")
            } else {
                format!("type {type_tag} cannot declare sub-fields")
            };
            return Err(ModelError::InvalidField { name, message });
        }
        Ok(Self {
            name,
            type_tag,
            sub_fields,
        })
    }

    /// Descriptor for a leaf column.
    ///
    /// Record tags carry sub-fields and go through [`FieldDescriptor::record`]
    /// or [`FieldDescriptor::repeated_record`] instead.
    pub fn scalar(name: impl Into<String>, type_tag: TypeTag) -> Self {
        debug_assert!(!type_tag.is_nested_record(), "record tags need sub-fields");
        Self {
            name: name.into(),
            type_tag,
            sub_fields: Vec::new(),
        }
    }

    /// Descriptor for a `STRUCT` column.
    pub fn record(name: impl Into<String>, sub_fields: Vec<FieldDescriptor>) -> Result<Self> {
        Self::new(name, TypeTag::Struct, sub_fields)
    }

    /// Descriptor for an `ARRAY<STRUCT>` column.
    pub fn repeated_record(
        name: impl Into<String>,
        sub_fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        Self::new(name, TypeTag::array_of(TypeTag::Struct), sub_fields)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn sub_fields(&self) -> &[FieldDescriptor] {
        &self.sub_fields
    }
}

/// Ordered field descriptors of one result set. Position in `fields`
/// matches position in each [`crate::Row`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field whose name matches `name` case-insensitively.
    /// When several fields match, the last declared one wins.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .rposition(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Returns true if a field named `name` (case-insensitive) exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_and_standard_names() {
        assert_eq!("INTEGER".parse::<TypeTag>().unwrap(), TypeTag::Int64);
        assert_eq!("record".parse::<TypeTag>().unwrap(), TypeTag::Struct);
        assert_eq!("BIGNUMERIC".parse::<TypeTag>().unwrap(), TypeTag::Decimal);
        assert_eq!(
            "ARRAY<STRUCT>".parse::<TypeTag>().unwrap(),
            TypeTag::array_of(TypeTag::Struct)
        );
        assert_eq!(
            "INTERVAL".parse::<TypeTag>().unwrap(),
            TypeTag::Other("INTERVAL".to_string())
        );
    }

    #[test]
    fn rejects_sub_fields_on_scalar_tag() {
        let sub = FieldDescriptor::scalar("inner", TypeTag::String);
        let err = FieldDescriptor::new("outer", TypeTag::String, vec![sub]).unwrap_err();
        assert!(err.to_string().contains("outer"));
    }

    #[test]
    fn record_tags_require_sub_fields() {
        let err = FieldDescriptor::record("meta", Vec::new()).unwrap_err();
        assert!(err.to_string().contains("requires at least one sub-field"));
        assert!(FieldDescriptor::new("events", TypeTag::array_of(TypeTag::Struct), Vec::new()).is_err());
        let sub = FieldDescriptor::scalar("inner", TypeTag::String);
        assert!(FieldDescriptor::repeated_record("events", vec![sub]).is_ok());
    }

    #[test]
    fn position_prefers_last_duplicate() {
        let schema = Schema::new(vec![
            FieldDescriptor::scalar("Id", TypeTag::String),
            FieldDescriptor::scalar("id", TypeTag::Int64),
        ]);
        assert_eq!(schema.position_of("ID"), Some(1));
        assert!(!schema.contains("missing"));
    }
}
