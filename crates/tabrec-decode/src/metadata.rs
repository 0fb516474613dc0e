//! Free-form metadata extraction.

use tabrec_model::{Record, Row, Schema, Value};
use tracing::debug;

use crate::decoder::decode;
use crate::index::SchemaIndex;

/// Key used when metadata cannot be reinterpreted as a record.
pub const RAW_METADATA_KEY: &str = "raw";

/// Extract the metadata record of `row` from the first populated candidate field.
pub fn extract_metadata<S: AsRef<str>>(row: &Row, schema: &Schema, candidates: &[S]) -> Record {
    extract_metadata_indexed(row, &SchemaIndex::new(schema), candidates)
}

/// Same as [`extract_metadata`] with a prebuilt index.
///
/// Candidates are scanned in order and the first one present in the schema
/// with a non-null cell is selected; later candidates are never merged in.
pub fn extract_metadata_indexed<S: AsRef<str>>(
    row: &Row,
    index: &SchemaIndex<'_>,
    candidates: &[S],
) -> Record {
    let selected = candidates
        .iter()
        .filter_map(|candidate| index.cell(row, candidate.as_ref()))
        .find(|(_, cell)| !cell.is_null());
    let Some((field, cell)) = selected else {
        return Record::new();
    };
    into_record(decode(field, cell), field.name())
}

fn into_record(value: Value, field_name: &str) -> Record {
    match value {
        Value::Null => Record::new(),
        Value::Record(record) => record,
        Value::Text(text) => reinterpret_text(text, field_name),
        other => {
            debug!(field = field_name, "metadata is not a record; keeping raw form");
            let text = other.text_form().unwrap_or_default();
            Record::single(RAW_METADATA_KEY, Value::Text(text))
        }
    }
}

/// Structural reinterpretation of textual metadata (JSON columns, JSON held
/// in STRING columns). Anything that is not a JSON object is kept raw.
fn reinterpret_text(text: String, field_name: &str) -> Record {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(map)) => Record::from(map),
        Ok(_) => {
            debug!(field = field_name, "metadata JSON is not an object; keeping raw text");
            Record::single(RAW_METADATA_KEY, Value::Text(text))
        }
        Err(error) => {
            debug!(field = field_name, %error, "metadata is not JSON; keeping raw text");
            Record::single(RAW_METADATA_KEY, Value::Text(text))
        }
    }
}
