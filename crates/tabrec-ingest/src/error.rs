#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse result set JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema: {source}")]
    Schema {
        #[source]
        source: tabrec_model::ModelError,
    },

    #[error("row {row} has {cells} cells but the schema declares {fields} fields")]
    RowWidth {
        row: usize,
        cells: usize,
        fields: usize,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
