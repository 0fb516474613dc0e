//! Command implementations, independent of argument parsing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tabrec_decode::{FieldPlan, RowMapper};
use tabrec_fetch::{
    ColumnResolver, CommandSource, FetchConfig, MessageFilter, MessageService, QueryRequest,
    SnapshotExecutor, WarehouseFetcher,
};
use tabrec_ingest::read_result_set;
use tabrec_model::DomainRecord;
use tracing::{info, trace};

use crate::logging::redact_value;

/// Decode a stored result set through the row mapper.
pub fn run_decode(result_path: &Path, config_path: Option<&Path>) -> Result<Vec<DomainRecord>> {
    let config = load_config(config_path)?;
    let result = read_result_set(result_path)
        .with_context(|| format!("failed to load result set {}", result_path.display()))?;
    let plan =
        FieldPlan::default().with_timestamp_columns(&config.warehouse.effective_order_columns());
    let records = RowMapper::new(plan).map_result_set(&result);
    trace_records(&records);
    info!(count = records.len(), "decoded result set");
    Ok(records)
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
    pub filter: MessageFilter,
}

/// Run the resolver cascade against a snapshot, with the configured fallback.
pub fn run_fetch(options: &FetchOptions) -> Result<Vec<DomainRecord>> {
    let config = load_config(options.config.as_deref())?;
    let executor = SnapshotExecutor::from_path(&options.snapshot)
        .with_context(|| format!("failed to load snapshot {}", options.snapshot.display()))?;
    let fetcher = WarehouseFetcher::new(Arc::new(executor), &config.warehouse);

    let mut service = MessageService::new().with_primary(fetcher);
    if let Some(fallback) = CommandSource::from_config(&config.fallback) {
        info!(program = %fallback.program().display(), "fallback producer configured");
        service = service.with_fallback(fallback);
    }

    let records = service
        .find_messages(&options.filter)
        .context("failed to fetch collection messages")?;
    trace_records(&records);
    Ok(records)
}

/// Resolver candidates in probe order, with the query each would run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    pub table: String,
    pub preferred: Option<String>,
    pub candidates: Vec<Option<String>>,
    pub queries: Vec<String>,
}

pub fn run_candidates(config_path: Option<&Path>, prefer: Option<&str>) -> Result<CandidateList> {
    let config = load_config(config_path)?;
    let warehouse = &config.warehouse;
    let mut resolver = ColumnResolver::new(&warehouse.effective_order_columns());
    if !warehouse.unordered_fallback {
        resolver = resolver.without_unordered_fallback();
    }
    if let Some(column) = prefer {
        resolver = resolver.with_preferred(column);
    }

    let table = warehouse.qualified_table();
    let candidates = resolver.candidates();
    let queries = candidates
        .iter()
        .map(|column| {
            QueryRequest::messages(&table, column.as_deref(), warehouse.effective_max_rows()).sql
        })
        .collect();
    Ok(CandidateList {
        table,
        preferred: resolver.preferred(),
        candidates,
        queries,
    })
}

fn load_config(path: Option<&Path>) -> Result<FetchConfig> {
    FetchConfig::load(path).context("failed to load configuration")
}

fn trace_records(records: &[DomainRecord]) {
    for record in records {
        trace!(
            id = %record.id,
            severity = %record.severity,
            summary = redact_value(&record.summary),
            "record"
        );
    }
}
