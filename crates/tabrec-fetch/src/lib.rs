//! Fetching collection messages from a warehouse table with adaptive
//! ordering-column resolution, plus an external-command fallback producer.
//!
//! - **resolver**: ranked ordering columns with a self-correcting preference
//! - **query**: the message query template and the executor seam
//! - **warehouse**: the candidate cascade over an executor
//! - **snapshot**: an offline executor over a stored result set
//! - **command**: the fallback producer
//! - **service**: source fallback, ordering and filters
//! - **config**: TOML configuration

pub mod command;
pub mod config;
pub mod error;
pub mod query;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod warehouse;

pub use command::CommandSource;
pub use config::{FallbackConfig, FetchConfig, WarehouseConfig};
pub use error::{ExecutorError, FailureCategory, FetchError, Result};
pub use query::{LIMIT_PARAM, QueryExecutor, QueryParam, QueryRequest};
pub use resolver::{ColumnResolver, MISSING_COLUMN_MARKER, is_missing_column};
pub use service::{MessageFilter, MessageService};
pub use snapshot::SnapshotExecutor;
pub use source::MessageSource;
pub use warehouse::WarehouseFetcher;
