use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::info;

use super::Source;
use crate::config::SourcesConfig;
use crate::error::{PipelineError, Result};
use crate::schema::{ColumnType, TableSchema};
use crate::table::{Table, Value};

/// Reads each table from a delimited file resolved through the sources config
pub struct CsvSource<'a> {
    config: &'a SourcesConfig,
}

impl<'a> CsvSource<'a> {
    pub fn new(config: &'a SourcesConfig) -> Self {
        Self { config }
    }
}

impl Source for CsvSource<'_> {
    fn read(&self, schema: &TableSchema) -> Result<Table> {
        let path = self.config.path_for(schema);
        let file = File::open(&path).map_err(|e| {
            PipelineError::source_unavailable(
                schema.name,
                format!("cannot open {}: {}", path.display(), e),
            )
        })?;

        let table = read_csv(schema, BufReader::new(file), self.config.delimiter_byte())?;
        info!(
            table = schema.name,
            rows = table.len(),
            path = %path.display(),
            "Read source file"
        );
        Ok(table)
    }
}

/// Parse delimited text with a header row into a table for `schema`.
///
/// Declared columns must be present and parse as their declared type.
/// Any other column is carried along with its type inferred per field.
pub fn read_csv(schema: &TableSchema, input: impl Read, delimiter: u8) -> Result<Table> {
    let unavailable = |reason: String| PipelineError::source_unavailable(schema.name, reason);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| unavailable(format!("cannot read header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if let Some(missing) = schema
        .columns
        .iter()
        .find(|c| !columns.iter().any(|name| name == c.name))
    {
        return Err(unavailable(format!("missing column {}", missing.name)));
    }

    let types: Vec<Option<ColumnType>> = columns
        .iter()
        .map(|name| schema.column(name).map(|c| c.col_type))
        .collect();

    let mut table = Table::new(schema.name, columns);

    for record in reader.records() {
        let record = record.map_err(|e| unavailable(format!("malformed row: {}", e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let row = record
            .iter()
            .zip(&types)
            .map(|(raw, col_type)| match col_type {
                Some(t) => Value::parse_as(raw, *t),
                None => Ok(Value::infer(raw)),
            })
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(|e| unavailable(format!("line {}: {}", line, e)))?;

        table
            .push_row(row)
            .map_err(|e| unavailable(format!("line {}: {}", line, e)))?;
    }

    Ok(table)
}
