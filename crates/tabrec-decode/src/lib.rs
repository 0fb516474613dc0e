//! Adaptive, schema-driven decoding of warehouse rows.
//!
//! - **timestamp**: heterogeneous timestamp encodings into one instant type
//! - **decoder**: typed cell decoding into canonical values
//! - **metadata**: free-form metadata extraction with raw-text degradation
//! - **plan**: ranked candidate columns and defaults per domain attribute
//! - **mapper**: orchestration into finished domain records

pub mod decoder;
pub mod index;
pub mod mapper;
pub mod metadata;
pub mod plan;
pub mod timestamp;

pub use decoder::decode;
pub use index::SchemaIndex;
pub use mapper::RowMapper;
pub use metadata::{RAW_METADATA_KEY, extract_metadata, extract_metadata_indexed};
pub use plan::{AttributeDefault, Casing, FieldPlan, TextAttribute, TIMESTAMP_COLUMNS};
pub use timestamp::{normalize, parse_timestamp};
