//! TOML configuration for the warehouse source and the fallback producer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabrec_decode::TIMESTAMP_COLUMNS;
use tracing::debug;

use crate::error::{FetchError, Result};

pub const DEFAULT_DATASET: &str = "monitoring";
pub const DEFAULT_TABLE: &str = "collection_messages";
pub const DEFAULT_MAX_ROWS: i64 = 200;
pub const DEFAULT_FALLBACK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub warehouse: WarehouseConfig,
    pub fallback: FallbackConfig,
}

impl FetchConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| FetchError::io(path, e))?;
        let config = Self::parse(&contents).map_err(|source| FetchError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub table: String,
    pub max_rows: i64,
    /// Ranked ordering columns, most preferred first.
    pub order_columns: Vec<String>,
    /// Read the table unordered once every ordering column is missing.
    pub unordered_fallback: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: DEFAULT_DATASET.to_string(),
            table: DEFAULT_TABLE.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            order_columns: TIMESTAMP_COLUMNS.iter().map(ToString::to_string).collect(),
            unordered_fallback: true,
        }
    }
}

impl WarehouseConfig {
    /// Backtick-quoted `dataset.table` or `project.dataset.table`.
    /// Blank parts fall back to their defaults; a blank project is omitted.
    pub fn qualified_table(&self) -> String {
        let dataset = non_blank(&self.dataset).unwrap_or(DEFAULT_DATASET);
        let table = non_blank(&self.table).unwrap_or(DEFAULT_TABLE);
        match self.project_id.as_deref().and_then(non_blank) {
            Some(project) => format!("`{project}.{dataset}.{table}`"),
            None => format!("`{dataset}.{table}`"),
        }
    }

    /// Row limit; non-positive values mean the default.
    pub fn effective_max_rows(&self) -> i64 {
        if self.max_rows > 0 {
            self.max_rows
        } else {
            DEFAULT_MAX_ROWS
        }
    }

    /// Configured ordering columns, or the defaults when none are usable.
    pub fn effective_order_columns(&self) -> Vec<String> {
        let columns: Vec<String> = self
            .order_columns
            .iter()
            .filter_map(|c| non_blank(c))
            .map(ToString::to_string)
            .collect();
        if columns.is_empty() {
            TIMESTAMP_COLUMNS.iter().map(ToString::to_string).collect()
        } else {
            columns
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    pub program: Option<PathBuf>,
    pub args: Vec<String>,
    pub timeout_secs: u64,
    pub env: BTreeMap<String, String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: None,
            args: Vec::new(),
            timeout_secs: DEFAULT_FALLBACK_TIMEOUT_SECS,
            env: BTreeMap::new(),
        }
    }
}

impl FallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// The program to run, when the fallback is enabled and has one.
    pub fn active_program(&self) -> Option<&Path> {
        if self.enabled {
            self.program.as_deref()
        } else {
            None
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_table_forms() {
        let mut config = WarehouseConfig::default();
        assert_eq!(config.qualified_table(), "`monitoring.collection_messages`");
        config.project_id = Some("acme".to_string());
        config.table = "  ".to_string();
        assert_eq!(config.qualified_table(), "`acme.monitoring.collection_messages`");
    }

    #[test]
    fn non_positive_max_rows_use_default() {
        let config = WarehouseConfig {
            max_rows: 0,
            ..WarehouseConfig::default()
        };
        assert_eq!(config.effective_max_rows(), DEFAULT_MAX_ROWS);
    }
}
