//! Static run configuration, read once at startup.
//!
//! ```toml
//! [sources]
//! directory = "data"
//! delimiter = ","
//!
//! [sources.files]
//! order_items = "exports/order_items_2024.csv"
//!
//! [database]
//! path = "retail_db.sqlite"
//!
//! [logging]
//! file = "logs/pipeline.log"
//! level = "info"
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::{get_table, TableSchema};

pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sources: SourcesConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    /// Directory holding the CSV files
    pub directory: PathBuf,
    pub delimiter: char,
    /// Per-table file overrides, relative to `directory` unless absolute
    pub files: BTreeMap<String, PathBuf>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            delimiter: ',',
            files: BTreeMap::new(),
        }
    }
}

impl SourcesConfig {
    pub fn path_for(&self, schema: &TableSchema) -> PathBuf {
        match self.files.get(schema.name) {
            Some(file) => self.directory.join(file),
            None => self.directory.join(schema.source_file),
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        // Checked to be ASCII by Config::validate
        self.delimiter as u8
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Create the database file when it does not exist yet
    pub create_if_missing: bool,
    /// Issue CREATE TABLE IF NOT EXISTS before loading
    pub create_tables: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("retail_db.sqlite"),
            create_if_missing: false,
            create_tables: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/pipeline.log"),
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit path if given, otherwise the first of
    /// `./pipeline.toml` and the user config dir that exists, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "retail-loader") {
            let user = dirs.config_dir().join(DEFAULT_CONFIG_FILE);
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.sources.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.sources.delimiter
            )));
        }

        if let Some(unknown) = self.sources.files.keys().find(|t| get_table(t).is_none()) {
            return Err(ConfigError::Invalid(format!(
                "unknown table in sources.files: {}",
                unknown
            )));
        }

        Ok(())
    }
}
