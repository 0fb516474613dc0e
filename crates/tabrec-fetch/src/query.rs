//! Query requests and the executor seam.

use std::collections::BTreeMap;

use tabrec_model::ResultSet;

use crate::error::ExecutorError;

/// Name of the row-limit parameter bound into every message query.
pub const LIMIT_PARAM: &str = "limit";

/// Named query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Int64(i64),
    String(String),
}

/// A query plus its named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub params: BTreeMap<String, QueryParam>,
    /// Column substituted into the `ORDER BY` clause, if any.
    pub order_by: Option<String>,
}

impl QueryRequest {
    /// `SELECT * FROM <table> [ORDER BY <column> DESC] LIMIT @limit`.
    pub fn messages(qualified_table: &str, order_by: Option<&str>, limit: i64) -> Self {
        let order_by = order_by
            .map(str::trim)
            .filter(|column| !column.is_empty());
        let mut sql = format!("SELECT * FROM {qualified_table}");
        if let Some(column) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(column);
            sql.push_str(" DESC");
        }
        sql.push_str(" LIMIT @");
        sql.push_str(LIMIT_PARAM);

        let mut params = BTreeMap::new();
        params.insert(LIMIT_PARAM.to_string(), QueryParam::Int64(limit));
        Self {
            sql,
            params,
            order_by: order_by.map(ToString::to_string),
        }
    }

    pub fn limit(&self) -> Option<i64> {
        match self.params.get(LIMIT_PARAM) {
            Some(QueryParam::Int64(limit)) => Some(*limit),
            _ => None,
        }
    }
}

/// Blocking query execution against a warehouse.
///
/// Implementations own connection, timeout and cancellation handling.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, request: &QueryRequest) -> Result<ResultSet, ExecutorError>;
}
