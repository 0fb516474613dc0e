//! Warehouse fetch cascade.

use std::sync::Arc;

use tabrec_decode::RowMapper;
use tabrec_model::DomainRecord;
use tracing::{debug, info};

use crate::config::WarehouseConfig;
use crate::error::{FetchError, Result};
use crate::query::{QueryExecutor, QueryRequest};
use crate::resolver::{ColumnResolver, is_missing_column};
use crate::source::MessageSource;

/// Fetches collection messages from a warehouse table, probing ordering
/// columns through a shared [`ColumnResolver`].
pub struct WarehouseFetcher {
    executor: Arc<dyn QueryExecutor>,
    resolver: Arc<ColumnResolver>,
    mapper: RowMapper,
    table: String,
    max_rows: i64,
}

impl std::fmt::Debug for WarehouseFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseFetcher")
            .field("resolver", &self.resolver)
            .field("table", &self.table)
            .field("max_rows", &self.max_rows)
            .finish_non_exhaustive()
    }
}

impl WarehouseFetcher {
    pub fn new(executor: Arc<dyn QueryExecutor>, config: &WarehouseConfig) -> Self {
        let mut resolver = ColumnResolver::new(&config.effective_order_columns());
        if !config.unordered_fallback {
            resolver = resolver.without_unordered_fallback();
        }
        Self {
            executor,
            resolver: Arc::new(resolver),
            mapper: RowMapper::default(),
            table: config.qualified_table(),
            max_rows: config.effective_max_rows(),
        }
    }

    /// Share an existing resolver, so its preference survives across fetchers.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<ColumnResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: RowMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn resolver(&self) -> &Arc<ColumnResolver> {
        &self.resolver
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run the query against each ordering candidate until one succeeds.
    ///
    /// A failure naming the attempted column as unrecognized moves on to the
    /// next candidate; any other failure is returned immediately.
    pub fn fetch_messages(&self) -> Result<Vec<DomainRecord>> {
        let mut last_missing = None;

        for candidate in self.resolver.candidates() {
            let column = candidate.as_deref();
            let request = QueryRequest::messages(&self.table, column, self.max_rows);
            match self.executor.execute(&request) {
                Ok(result) => {
                    self.resolver.on_query_succeeded(column);
                    let records = self.mapper.map_result_set(&result);
                    info!(
                        count = records.len(),
                        order_by = column.unwrap_or("<none>"),
                        table = %self.table,
                        "retrieved collection messages"
                    );
                    return Ok(records);
                }
                Err(error) => match column {
                    Some(column) if is_missing_column(&error.message, column) => {
                        debug!(column, table = %self.table, "ordering column not found; trying next");
                        self.resolver.on_column_missing(column);
                        last_missing = Some(error);
                    }
                    _ => return Err(FetchError::Executor { source: error }),
                },
            }
        }

        Err(FetchError::ExhaustedCandidates {
            candidates: self.resolver.ranked().to_vec(),
            table: self.table.clone(),
            source: last_missing,
        })
    }
}

impl MessageSource for WarehouseFetcher {
    fn name(&self) -> &str {
        "warehouse"
    }

    fn fetch_messages(&self) -> Result<Vec<DomainRecord>> {
        WarehouseFetcher::fetch_messages(self)
    }
}
