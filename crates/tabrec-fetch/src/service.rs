//! Message listing with source fallback and filters.

use std::cmp::Reverse;

use tabrec_model::{DomainRecord, Severity};
use tracing::{debug, warn};

use crate::error::{FetchError, Result};
use crate::source::MessageSource;

/// Filters applied to the merged, newest-first message list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Ignored when it does not name a known severity.
    pub severity: Option<String>,
    /// Case-insensitive exact match; blank is ignored.
    pub collector: Option<String>,
    /// Ignored when zero.
    pub limit: Option<usize>,
}

impl MessageFilter {
    fn severity_level(&self) -> Option<Severity> {
        self.severity
            .as_deref()
            .map(Severity::from_label)
            .filter(|level| *level != Severity::Unknown)
    }

    fn collector_name(&self) -> Option<&str> {
        self.collector
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Sort newest first, then filter and truncate.
    pub fn apply(&self, mut records: Vec<DomainRecord>) -> Vec<DomainRecord> {
        records.sort_by_key(|record| Reverse(record.created_at));
        let severity = self.severity_level();
        let collector = self.collector_name();
        let limit = self.limit.filter(|limit| *limit > 0).unwrap_or(usize::MAX);

        records
            .into_iter()
            .filter(|record| severity.is_none_or(|level| record.severity_level() == level))
            .filter(|record| {
                collector.is_none_or(|name| record.collector.eq_ignore_ascii_case(name))
            })
            .take(limit)
            .collect()
    }
}

/// Lists messages from a primary source, falling back to a secondary one
/// when the primary fails or returns nothing.
#[derive(Default)]
pub struct MessageService {
    primary: Option<Box<dyn MessageSource>>,
    fallback: Option<Box<dyn MessageSource>>,
}

impl MessageService {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_primary(mut self, source: impl MessageSource + 'static) -> Self {
        self.primary = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, source: impl MessageSource + 'static) -> Self {
        self.fallback = Some(Box::new(source));
        self
    }

    pub fn find_messages(&self, filter: &MessageFilter) -> Result<Vec<DomainRecord>> {
        let records = self.load_messages()?;
        Ok(filter.apply(records))
    }

    fn load_messages(&self) -> Result<Vec<DomainRecord>> {
        if let Some(primary) = &self.primary {
            match primary.fetch_messages() {
                Ok(records) if !records.is_empty() || self.fallback.is_none() => {
                    return Ok(records);
                }
                Ok(_) => {
                    debug!(source = primary.name(), "primary returned no messages; using fallback");
                }
                Err(error) if self.fallback.is_none() => return Err(error),
                Err(error) => {
                    warn!(source = primary.name(), %error, "primary failed; using fallback");
                }
            }
        }

        match &self.fallback {
            Some(fallback) => fallback.fetch_messages(),
            None => Err(FetchError::NoSource),
        }
    }
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("primary", &self.primary.as_deref().map(MessageSource::name))
            .field("fallback", &self.fallback.as_deref().map(MessageSource::name))
            .finish()
    }
}
