//! Field plan: per domain attribute, the ranked candidate columns and the
//! default applied when none of them is populated.

pub use tabrec_model::{MISSING_SUMMARY, UNKNOWN_COLLECTOR, UNKNOWN_SEVERITY};
use uuid::Uuid;

/// Columns tried, in order, for the record time. Also the ordering columns.
pub const TIMESTAMP_COLUMNS: [&str; 7] = [
    "created_at",
    "createdAt",
    "timestamp",
    "event_timestamp",
    "eventTimestamp",
    "inserted_at",
    "insertedAt",
];

pub const ID_COLUMNS: [&str; 6] = ["id", "message_id", "messageId", "event_id", "eventId", "insertId"];

pub const COLLECTOR_COLUMNS: [&str; 6] = [
    "collector",
    "collector_id",
    "collectorId",
    "source",
    "functionName",
    "pipeline",
];

pub const SEVERITY_COLUMNS: [&str; 3] = ["severity", "status", "level"];

pub const SUMMARY_COLUMNS: [&str; 5] = ["summary", "message", "description", "detail", "details"];

pub const DATASET_COLUMNS: [&str; 4] = ["dataset", "table", "target_table", "resource"];

pub const METADATA_COLUMNS: [&str; 4] = ["metadata", "meta", "details", "info"];

/// Value applied to a text attribute when every candidate is absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeDefault {
    Fixed(String),
    /// A fresh random UUID per record.
    GeneratedId,
}

impl AttributeDefault {
    pub fn fixed(value: impl Into<String>) -> Self {
        AttributeDefault::Fixed(value.into())
    }

    pub fn produce(&self) -> String {
        match self {
            AttributeDefault::Fixed(value) => value.clone(),
            AttributeDefault::GeneratedId => Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Casing {
    #[default]
    Preserve,
    Upper,
}

/// Plan for one text attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAttribute {
    pub candidates: Vec<String>,
    pub default: AttributeDefault,
    pub casing: Casing,
}

impl TextAttribute {
    pub fn new<S: AsRef<str>>(candidates: &[S], default: AttributeDefault) -> Self {
        Self {
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
            default,
            casing: Casing::Preserve,
        }
    }

    #[must_use]
    pub fn with_casing(mut self, casing: Casing) -> Self {
        self.casing = casing;
        self
    }

    /// Trim and apply the attribute's casing to a selected value.
    pub fn normalize(&self, value: &str) -> String {
        let trimmed = value.trim();
        match self.casing {
            Casing::Preserve => trimmed.to_string(),
            Casing::Upper => trimmed.to_uppercase(),
        }
    }
}

/// Candidate columns and defaults for every domain attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub id: TextAttribute,
    pub collector: TextAttribute,
    pub severity: TextAttribute,
    pub summary: TextAttribute,
    pub dataset: TextAttribute,
    /// Record-time candidates; the default is the decode time.
    pub timestamp: Vec<String>,
    pub metadata: Vec<String>,
}

impl Default for FieldPlan {
    fn default() -> Self {
        Self {
            id: TextAttribute::new(&ID_COLUMNS, AttributeDefault::GeneratedId),
            collector: TextAttribute::new(
                &COLLECTOR_COLUMNS,
                AttributeDefault::fixed(UNKNOWN_COLLECTOR),
            ),
            severity: TextAttribute::new(
                &SEVERITY_COLUMNS,
                AttributeDefault::fixed(UNKNOWN_SEVERITY),
            )
            .with_casing(Casing::Upper),
            summary: TextAttribute::new(&SUMMARY_COLUMNS, AttributeDefault::fixed(MISSING_SUMMARY)),
            dataset: TextAttribute::new(&DATASET_COLUMNS, AttributeDefault::fixed("")),
            timestamp: TIMESTAMP_COLUMNS.iter().map(ToString::to_string).collect(),
            metadata: METADATA_COLUMNS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FieldPlan {
    /// Replace the record-time candidates, e.g. from configuration.
    #[must_use]
    pub fn with_timestamp_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.timestamp = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }
}
