#![deny(unsafe_code)]

pub mod cell;
pub mod error;
pub mod record;
pub mod schema;
pub mod severity;
pub mod value;

pub use cell::{NativeScalar, RawCell, ResultSet, Row};
pub use error::{ModelError, Result};
pub use record::{DomainRecord, MISSING_SUMMARY, UNKNOWN_COLLECTOR, UNKNOWN_SEVERITY};
pub use schema::{FieldDescriptor, Schema, TypeTag};
pub use severity::Severity;
pub use value::{Record, Value};

/// Exact `NUMERIC` value. Literals beyond its 28-digit range do not parse.
pub use rust_decimal::Decimal;
