use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Record, Severity};

/// Collector label used when no collector is known.
pub const UNKNOWN_COLLECTOR: &str = "desconhecido";

/// Severity label used when no severity is known.
pub const UNKNOWN_SEVERITY: &str = "UNKNOWN";

/// Summary sentence used when no summary is known.
pub const MISSING_SUMMARY: &str = "Mensagem não informada";

/// Finished collection message decoded from one row.
///
/// The JSON shape (`id`, `collector`, `severity`, `summary`, `dataset`,
/// `createdAt`, `metadata`) is shared with the alternative producer. When
/// reading that shape, a null, missing or blank text field takes the same
/// default the row mapper applies, and null metadata is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProducedRecord")]
pub struct DomainRecord {
    pub id: String,
    pub collector: String,
    /// Case-normalized free text; see [`DomainRecord::severity_level`].
    pub severity: String,
    pub summary: String,
    pub dataset: String,
    pub created_at: DateTime<Utc>,
    pub metadata: Record,
}

impl DomainRecord {
    /// Severity parsed into the fixed vocabulary.
    pub fn severity_level(&self) -> Severity {
        Severity::from_label(&self.severity)
    }
}

/// Producer JSON as written, before defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProducedRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    collector: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    dataset: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    metadata: Option<Record>,
}

impl From<ProducedRecord> for DomainRecord {
    fn from(raw: ProducedRecord) -> Self {
        Self {
            id: present(raw.id).unwrap_or_else(|| Uuid::new_v4().to_string()),
            collector: present(raw.collector).unwrap_or_else(|| UNKNOWN_COLLECTOR.to_string()),
            severity: present(raw.severity).unwrap_or_else(|| UNKNOWN_SEVERITY.to_string()),
            summary: present(raw.summary).unwrap_or_else(|| MISSING_SUMMARY.to_string()),
            dataset: raw.dataset.unwrap_or_default(),
            created_at: raw.created_at,
            metadata: raw.metadata.unwrap_or_default(),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
