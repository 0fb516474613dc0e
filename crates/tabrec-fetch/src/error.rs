use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tabrec_ingest::IngestError;

/// Failure category reported by a query executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Transient,
    /// A referenced table or column does not exist.
    MissingResource,
    Other,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureCategory::Transient => "transient",
            FailureCategory::MissingResource => "missing resource",
            FailureCategory::Other => "other",
        };
        f.write_str(label)
    }
}

/// Failure returned by a [`crate::QueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutorError {
    pub category: FailureCategory,
    pub message: String,
}

impl ExecutorError {
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn missing_resource(message: impl Into<String>) -> Self {
        Self::new(FailureCategory::MissingResource, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(FailureCategory::Transient, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureCategory::Other, message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every ordering candidate was reported missing from the table.
    #[error("None of the configured timestamp columns [{}] were found in table {table}", .candidates.join(", "))]
    ExhaustedCandidates {
        candidates: Vec<String>,
        table: String,
        #[source]
        source: Option<ExecutorError>,
    },

    #[error("Failed to query warehouse for collection messages")]
    Executor {
        #[source]
        source: ExecutorError,
    },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to run fallback command {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fallback command {program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("fallback command {program} exited with status {status} and stdout: {stdout}{}", stderr_suffix(.stderr))]
    CommandFailed {
        program: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("fallback command {program} produced invalid JSON: {source}")]
    FallbackJson {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no message source configured")]
    NoSource,
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!("; stderr: {}", stderr.trim())
    }
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
