//! Loading warehouse result sets stored as JSON.
//!
//! - **wire**: the warehouse REST shapes for schemas, rows and cells
//! - **result_file**: parsing whole responses from text or files

pub mod error;
pub mod result_file;
pub mod wire;

pub use error::{IngestError, Result};
pub use result_file::{WireResultSet, parse_result_set, read_result_set};
pub use wire::{WireCell, WireField, WireRow, WireSchema, cell_from_json};
