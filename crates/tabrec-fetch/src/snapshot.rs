//! Offline executor serving a stored result set.

use std::cmp::Reverse;
use std::path::Path;

use tabrec_decode::normalize;
use tabrec_ingest::read_result_set;
use tabrec_model::{ResultSet, Row};
use tracing::debug;

use crate::error::{ExecutorError, Result};
use crate::query::{QueryExecutor, QueryRequest};

/// Answers message queries from one stored result set, the way the warehouse
/// would: unknown ordering columns fail with `Unrecognized name`, rows are
/// ordered by the column's instant descending, and the limit is applied.
#[derive(Debug, Clone)]
pub struct SnapshotExecutor {
    result: ResultSet,
}

impl SnapshotExecutor {
    pub fn new(result: ResultSet) -> Self {
        Self { result }
    }

    /// Load a result set stored in the warehouse REST JSON shape.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(read_result_set(path)?))
    }
}

impl QueryExecutor for SnapshotExecutor {
    fn execute(&self, request: &QueryRequest) -> std::result::Result<ResultSet, ExecutorError> {
        let mut rows: Vec<Row> = self.result.rows.clone();

        if let Some(column) = request.order_by.as_deref() {
            let Some(position) = self.result.schema.position_of(column) else {
                return Err(ExecutorError::missing_resource(format!(
                    "Unrecognized name: {column}"
                )));
            };
            // Stable sort; rows without an instant keep their order after the rest.
            rows.sort_by_key(|row| Reverse(row.get(position).and_then(normalize)));
        }

        match request.limit() {
            Some(limit) => match usize::try_from(limit) {
                Ok(limit) => rows.truncate(limit),
                Err(_) => {
                    return Err(ExecutorError::other(format!(
                        "LIMIT expects a non-negative integer, got {limit}"
                    )));
                }
            },
            None => {
                return Err(ExecutorError::other("Query parameter 'limit' not found"));
            }
        }

        debug!(rows = rows.len(), order_by = ?request.order_by, "served snapshot query");
        Ok(ResultSet::new(self.result.schema.clone(), rows))
    }
}
