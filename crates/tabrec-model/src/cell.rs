//! Raw cells and rows as handed over by the query executor.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Decimal, Schema};

/// A scalar the source was able to expose in native form.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeScalar {
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Decimal(Decimal),
    Text(String),
    Instant(DateTime<Utc>),
}

impl NativeScalar {
    /// The scalar's own string form.
    pub fn render(&self) -> String {
        match self {
            NativeScalar::Bool(v) => v.to_string(),
            NativeScalar::Int64(v) => v.to_string(),
            NativeScalar::Float64(v) => v.to_string(),
            NativeScalar::Decimal(v) => v.to_string(),
            NativeScalar::Text(v) => v.clone(),
            NativeScalar::Instant(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// One cell of a row, positionally aligned with its field descriptor.
///
/// A primitive cell may carry a native scalar, a raw string, or both.
/// A primitive with neither is treated as null.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Null,
    Primitive {
        native: Option<NativeScalar>,
        text: Option<String>,
    },
    /// Nested cells aligned with the field's sub-field descriptors.
    Record(Vec<RawCell>),
    /// Repeated elements, each decoded with the element descriptor.
    Repeated(Vec<RawCell>),
}

impl RawCell {
    /// Cell exposing only a raw string.
    pub fn text(value: impl Into<String>) -> Self {
        RawCell::Primitive {
            native: None,
            text: Some(value.into()),
        }
    }

    /// Cell exposing only a native scalar.
    pub fn native(value: NativeScalar) -> Self {
        RawCell::Primitive {
            native: Some(value),
            text: None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            RawCell::Null
                | RawCell::Primitive {
                    native: None,
                    text: None
                }
        )
    }

    pub fn native_scalar(&self) -> Option<&NativeScalar> {
        match self {
            RawCell::Primitive { native, .. } => native.as_ref(),
            _ => None,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            RawCell::Primitive { text, .. } => text.as_deref(),
            _ => None,
        }
    }

    /// Best-available textual representation: the raw string when exposed,
    /// otherwise the native scalar's own string form. Nested cells render as
    /// a bracketed list of their children.
    pub fn text_form(&self) -> Option<Cow<'_, str>> {
        match self {
            RawCell::Null => None,
            RawCell::Primitive { native, text } => match (text, native) {
                (Some(text), _) => Some(Cow::Borrowed(text.as_str())),
                (None, Some(native)) => match native {
                    NativeScalar::Text(text) => Some(Cow::Borrowed(text.as_str())),
                    other => Some(Cow::Owned(other.render())),
                },
                (None, None) => None,
            },
            RawCell::Record(children) | RawCell::Repeated(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|child| {
                        child
                            .text_form()
                            .map_or_else(|| "null".to_string(), Cow::into_owned)
                    })
                    .collect();
                Some(Cow::Owned(format!("[{}]", parts.join(", "))))
            }
        }
    }
}

/// One result row. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<RawCell>,
}

impl Row {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    /// Cell at `position`; missing trailing cells read as `None`.
    pub fn get(&self, position: usize) -> Option<&RawCell> {
        self.cells.get(position)
    }

    pub fn cells(&self) -> &[RawCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Schema plus rows returned by one successful query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_primitive_is_null() {
        let cell = RawCell::Primitive {
            native: None,
            text: None,
        };
        assert!(cell.is_null());
        assert!(cell.text_form().is_none());
    }

    #[test]
    fn text_form_prefers_raw_string() {
        let cell = RawCell::Primitive {
            native: Some(NativeScalar::Int64(7)),
            text: Some("007".to_string()),
        };
        assert_eq!(cell.text_form().as_deref(), Some("007"));
        assert_eq!(
            RawCell::native(NativeScalar::Bool(true)).text_form().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn nested_text_form_lists_children() {
        let cell = RawCell::Repeated(vec![RawCell::text("a"), RawCell::Null]);
        assert_eq!(cell.text_form().as_deref(), Some("[a, null]"));
    }
}
