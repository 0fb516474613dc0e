//! Row mapping: one result row into one [`DomainRecord`].
//!
//! Mapping never fails. Absent, blank or malformed cells fall back to the
//! attribute defaults of the [`FieldPlan`], so one bad row never aborts the
//! rest of a result set.

use chrono::{DateTime, Utc};
use tabrec_model::{DomainRecord, ResultSet, Row, Schema, Value};
use tracing::debug;

use crate::decoder::decode;
use crate::index::SchemaIndex;
use crate::metadata::extract_metadata_indexed;
use crate::plan::{FieldPlan, TextAttribute};
use crate::timestamp::parse_timestamp;

/// Stateless row mapper. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct RowMapper {
    plan: FieldPlan,
    clock: fn() -> DateTime<Utc>,
}

impl Default for RowMapper {
    fn default() -> Self {
        Self::new(FieldPlan::default())
    }
}

impl RowMapper {
    pub fn new(plan: FieldPlan) -> Self {
        Self {
            plan,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for the record-time default.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn plan(&self) -> &FieldPlan {
        &self.plan
    }

    /// Map every row of a result set, in order.
    pub fn map_result_set(&self, result: &ResultSet) -> Vec<DomainRecord> {
        let index = SchemaIndex::new(&result.schema);
        let records: Vec<DomainRecord> = result
            .rows
            .iter()
            .map(|row| self.map_indexed(row, &index))
            .collect();
        debug!(rows = records.len(), "mapped result set");
        records
    }

    /// Map a single row against its schema.
    pub fn map(&self, row: &Row, schema: &Schema) -> DomainRecord {
        self.map_indexed(row, &SchemaIndex::new(schema))
    }

    /// Map a single row with a prebuilt index.
    pub fn map_indexed(&self, row: &Row, index: &SchemaIndex<'_>) -> DomainRecord {
        let created_at = self.first_timestamp(row, index).unwrap_or_else(|| {
            debug!("no populated timestamp column; using decode time");
            (self.clock)()
        });
        DomainRecord {
            id: self.text_attribute(row, index, &self.plan.id),
            collector: self.text_attribute(row, index, &self.plan.collector),
            severity: self.text_attribute(row, index, &self.plan.severity),
            summary: self.text_attribute(row, index, &self.plan.summary),
            dataset: self.text_attribute(row, index, &self.plan.dataset),
            created_at,
            metadata: extract_metadata_indexed(row, index, &self.plan.metadata),
        }
    }

    fn text_attribute(&self, row: &Row, index: &SchemaIndex<'_>, attribute: &TextAttribute) -> String {
        attribute
            .candidates
            .iter()
            .filter_map(|candidate| index.cell(row, candidate))
            .filter_map(|(field, cell)| decode(field, cell).text_form())
            .find(|text| !text.trim().is_empty())
            .map_or_else(|| attribute.default.produce(), |text| attribute.normalize(&text))
    }

    /// First candidate that yields an instant. Columns not tagged TIMESTAMP
    /// are decoded by their own tag and then re-parsed as text.
    fn first_timestamp(&self, row: &Row, index: &SchemaIndex<'_>) -> Option<DateTime<Utc>> {
        self.plan
            .timestamp
            .iter()
            .filter_map(|candidate| index.cell(row, candidate))
            .filter(|(_, cell)| !cell.is_null())
            .find_map(|(field, cell)| match decode(field, cell) {
                Value::Instant(instant) => Some(instant),
                Value::Null => None,
                other => other.text_form().and_then(|text| parse_timestamp(&text)),
            })
    }
}
