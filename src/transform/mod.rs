//! Per-table normalization and validation.
//!
//! Each table has one transform function. The [`STANDARD_STEPS`] list pairs
//! every schema with its transform in load order; the orchestrator walks it
//! and hands each step the tables already transformed before it.

pub mod categories;
pub mod customers;
pub mod departments;
pub mod order_items;
pub mod orders;
pub mod products;

use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::schema::{self, ForeignKey, TableSchema};
use crate::table::{Table, Value};

/// Maximum number of offending values quoted in an error message
const SAMPLE_LIMIT: usize = 5;

pub type TransformFn = fn(Table, &mut StepContext<'_>) -> Result<Table>;

/// One pipeline step: a table and the function that transforms it
#[derive(Clone, Copy)]
pub struct Step {
    pub schema: &'static TableSchema,
    pub transform: TransformFn,
}

/// The six retail tables in foreign-key order
pub static STANDARD_STEPS: &[Step] = &[
    Step {
        schema: &schema::DEPARTMENTS,
        transform: departments::transform,
    },
    Step {
        schema: &schema::CATEGORIES,
        transform: categories::transform,
    },
    Step {
        schema: &schema::CUSTOMERS,
        transform: customers::transform,
    },
    Step {
        schema: &schema::PRODUCTS,
        transform: products::transform,
    },
    Step {
        schema: &schema::ORDERS,
        transform: orders::transform,
    },
    Step {
        schema: &schema::ORDER_ITEMS,
        transform: order_items::transform,
    },
];

/// What a transform may see besides its own table
pub struct StepContext<'a> {
    upstream: &'a [Table],
    warnings: Vec<String>,
}

impl<'a> StepContext<'a> {
    pub fn new(upstream: &'a [Table]) -> Self {
        Self {
            upstream,
            warnings: Vec::new(),
        }
    }

    /// An already-transformed table
    pub fn upstream(&self, name: &str) -> Result<&'a Table> {
        self.upstream
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| PipelineError::Dependency(format!("{} has not been transformed", name)))
    }

    /// Record a non-fatal anomaly
    pub fn warn(&mut self, table: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(table, "{}", message);
        self.warnings.push(format!("{}: {}", table, message));
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

/// Index of a column the transform needs
pub(crate) fn require_column(table: &Table, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| PipelineError::validation(table.name(), format!("missing column {}", column)))
}

/// Fail unless every value of `fk.column` is a key of the referenced upstream table
pub(crate) fn check_references(table: &Table, fk: &ForeignKey, ctx: &StepContext<'_>) -> Result<()> {
    let parent = ctx.upstream(fk.references_table)?;
    let keys = parent.key_set(fk.references_column).ok_or_else(|| {
        PipelineError::Dependency(format!(
            "{} has no column {}",
            parent.name(),
            fk.references_column
        ))
    })?;

    let idx = require_column(table, fk.column)?;
    let orphans: Vec<&Value> = table
        .rows()
        .iter()
        .map(|row| &row[idx])
        .filter(|v| v.key().is_none_or(|k| !keys.contains(&k)))
        .collect();

    if orphans.is_empty() {
        return Ok(());
    }

    Err(PipelineError::validation(
        table.name(),
        format!(
            "{} rows have {} not present in {}.{}: {}",
            orphans.len(),
            fk.column,
            fk.references_table,
            fk.references_column,
            sample(&orphans)
        ),
    ))
}

/// Render up to SAMPLE_LIMIT values for a message
pub(crate) fn sample(values: &[&Value]) -> String {
    let mut shown: Vec<String> = values
        .iter()
        .take(SAMPLE_LIMIT)
        .map(|v| v.to_string())
        .collect();
    if values.len() > SAMPLE_LIMIT {
        shown.push(format!("... ({} more)", values.len() - SAMPLE_LIMIT));
    }
    shown.join(", ")
}
