use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Cannot connect to database {path:?}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Source for {table} unavailable: {reason}")]
    SourceUnavailable { table: String, reason: String },
    #[error("Validation failed for {table}: {reason}")]
    ValidationFailed { table: String, reason: String },
    #[error("Failed to write {table}: {source}")]
    SinkWriteFailed {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Dependency error: {0}")]
    Dependency(String),
}

impl PipelineError {
    pub fn source_unavailable(table: &str, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn validation(table: &str, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub fn sink_write(table: &str, source: rusqlite::Error) -> Self {
        Self::SinkWriteFailed {
            table: table.to_string(),
            source,
        }
    }

    /// Table the error is attached to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::SourceUnavailable { table, .. }
            | Self::ValidationFailed { table, .. }
            | Self::SinkWriteFailed { table, .. } => Some(table),
            Self::ConnectionFailed { .. } | Self::Dependency(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
