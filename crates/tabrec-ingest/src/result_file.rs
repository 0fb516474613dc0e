use std::path::Path;

use serde::{Deserialize, Serialize};
use tabrec_model::ResultSet;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::wire::{WireRow, WireSchema};

/// A stored query response: `{"schema": {...}, "rows": [...]}`.
///
/// Other top-level keys of the warehouse response (`jobComplete`,
/// `totalRows`, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireResultSet {
    #[serde(default)]
    pub schema: WireSchema,
    #[serde(default)]
    pub rows: Vec<WireRow>,
}

impl WireResultSet {
    pub fn to_result_set(&self) -> Result<ResultSet> {
        let schema = self.schema.to_schema()?;
        let mut rows = Vec::with_capacity(self.rows.len());
        for (index, wire_row) in self.rows.iter().enumerate() {
            if wire_row.f.len() > schema.len() {
                return Err(IngestError::RowWidth {
                    row: index,
                    cells: wire_row.f.len(),
                    fields: schema.len(),
                });
            }
            rows.push(wire_row.to_row());
        }
        Ok(ResultSet::new(schema, rows))
    }
}

/// Parse a result set from JSON text.
pub fn parse_result_set(json: &str) -> Result<ResultSet> {
    let wire: WireResultSet =
        serde_json::from_str(json).map_err(|source| IngestError::Json { source })?;
    wire.to_result_set()
}

/// Read and parse a result set stored on disk.
pub fn read_result_set(path: &Path) -> Result<ResultSet> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let result = parse_result_set(&content)?;
    debug!(
        path = %path.display(),
        fields = result.schema.len(),
        rows = result.rows.len(),
        "loaded result set"
    );
    Ok(result)
}
