//! Adaptive ordering-column resolution.
//!
//! The resolver remembers the last ordering column a query succeeded with and
//! probes it first next time. The preference is a hint: a cold resolver walks
//! the full ranked list and is always correct, only slower.

use parking_lot::RwLock;
use tracing::debug;

/// Marker a warehouse puts in the message of a "column does not exist" failure.
pub const MISSING_COLUMN_MARKER: &str = "unrecognized name";

/// Picks the ordering column for a query and adapts when it disappears.
#[derive(Debug)]
pub struct ColumnResolver {
    ranked: Vec<String>,
    unordered_fallback: bool,
    preferred: RwLock<Option<String>>,
}

impl ColumnResolver {
    /// Resolver over `ranked` candidates, ending with the unordered query.
    pub fn new<S: AsRef<str>>(ranked: &[S]) -> Self {
        Self {
            ranked: ranked.iter().map(|c| c.as_ref().to_string()).collect(),
            unordered_fallback: true,
            preferred: RwLock::new(None),
        }
    }

    /// Drop the trailing "no ordering column" candidate, so a table lacking
    /// every ranked column is reported as exhausted instead of read unordered.
    #[must_use]
    pub fn without_unordered_fallback(mut self) -> Self {
        self.unordered_fallback = false;
        self
    }

    /// Seed the preference, e.g. with a column known from a previous run.
    #[must_use]
    pub fn with_preferred(self, column: impl Into<String>) -> Self {
        self.on_query_succeeded(Some(&column.into()));
        self
    }

    pub fn ranked(&self) -> &[String] {
        &self.ranked
    }

    pub fn unordered_fallback(&self) -> bool {
        self.unordered_fallback
    }

    pub fn preferred(&self) -> Option<String> {
        self.preferred.read().clone()
    }

    /// Columns to try, in order. `None` stands for the query without ordering.
    ///
    /// The current preference comes first, then the ranked list with
    /// duplicates removed (first occurrence wins).
    pub fn candidates(&self) -> Vec<Option<String>> {
        let preferred = self.preferred();
        let mut ordered: Vec<String> = Vec::with_capacity(self.ranked.len() + 1);
        for column in preferred.iter().chain(self.ranked.iter()) {
            if !ordered.contains(column) {
                ordered.push(column.clone());
            }
        }
        let mut candidates: Vec<Option<String>> = ordered.into_iter().map(Some).collect();
        if self.unordered_fallback {
            candidates.push(None);
        }
        candidates
    }

    /// Record a successful query. The unordered query never becomes the preference.
    pub fn on_query_succeeded(&self, column: Option<&str>) {
        let Some(column) = column.filter(|c| !c.trim().is_empty()) else {
            return;
        };
        let mut preferred = self.preferred.write();
        if preferred.as_deref() != Some(column) {
            debug!(column, "ordering column preference updated");
            *preferred = Some(column.to_string());
        }
    }

    /// Record that `column` is missing from the live schema. The preference
    /// is cleared only when it still names that column.
    pub fn on_column_missing(&self, column: &str) {
        let mut preferred = self.preferred.write();
        if preferred.as_deref() == Some(column) {
            debug!(column, "ordering column preference cleared");
            *preferred = None;
        }
    }
}

/// Whether `message` reports `column` as missing from the schema.
///
/// Both the marker and the column are matched ASCII case-insensitively. A blank
/// column never matches.
pub fn is_missing_column(message: &str, column: &str) -> bool {
    if column.trim().is_empty() {
        return false;
    }
    let message = message.to_ascii_lowercase();
    message.contains(MISSING_COLUMN_MARKER) && message.contains(&column.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_resolver_lists_ranked_then_unordered() {
        let resolver = ColumnResolver::new(&["a", "b", "a"]);
        assert_eq!(
            resolver.candidates(),
            vec![Some("a".to_string()), Some("b".to_string()), None]
        );
    }

    #[test]
    fn clearing_a_different_column_keeps_preference() {
        let resolver = ColumnResolver::new(&["a", "b"]).with_preferred("b");
        resolver.on_column_missing("a");
        assert_eq!(resolver.preferred().as_deref(), Some("b"));
        resolver.on_column_missing("b");
        assert_eq!(resolver.preferred(), None);
    }

    #[test]
    fn missing_column_detection() {
        assert!(is_missing_column(
            "Unrecognized name: created_at at [1:45]",
            "created_at"
        ));
        assert!(is_missing_column("UNRECOGNIZED NAME: CreatedAt", "createdAt"));
        assert!(!is_missing_column("Access Denied: created_at", "created_at"));
        assert!(!is_missing_column("Unrecognized name: created_at", " "));
    }
}
