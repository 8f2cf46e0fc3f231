//! Orchestrates one load: connect, read and transform every table in
//! dependency order, then append them all to the sink in the same order.
//!
//! Nothing is written until every table has been read and transformed.
//! A failure while loading leaves earlier tables committed.

use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::reader::{CsvSource, Source};
use crate::schema::DependencyResolver;
use crate::table::Table;
use crate::transform::{Step, StepContext, STANDARD_STEPS};
use crate::writer::{Sink, SqliteSink};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Connecting,
    Reading(&'static str),
    Transforming(&'static str),
    Loading(&'static str),
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Init => write!(f, "init"),
            RunState::Connecting => write!(f, "connecting"),
            RunState::Reading(table) => write!(f, "reading {}", table),
            RunState::Transforming(table) => write!(f, "transforming {}", table),
            RunState::Loading(table) => write!(f, "loading {}", table),
            RunState::Done => write!(f, "done"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    /// Rows appended per table, in load order
    pub tables: Vec<(&'static str, u64)>,
    /// Non-fatal anomalies reported by transformers
    pub warnings: Vec<String>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Tracks state transitions and logs them
#[derive(Debug)]
struct StateTracker {
    state: RunState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: RunState::Init,
        }
    }

    fn enter(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
    }

    fn fail(&mut self, err: &PipelineError) {
        error!(
            state = %self.state,
            table = err.table().unwrap_or("-"),
            "Pipeline failed: {}",
            err
        );
        self.state = RunState::Failed;
    }
}

/// An ordered list of steps run against a source and a sink
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// departments, categories, customers, products, orders, order_items
    pub fn standard() -> Self {
        Self::new(STANDARD_STEPS.to_vec())
    }

    pub fn table_order(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.schema.name).collect()
    }

    /// Run against an already-open sink
    pub fn run<S: Sink>(&self, source: &impl Source, sink: &mut S) -> Result<LoadSummary> {
        self.track(|tracker| {
            self.check_order()?;
            self.execute(source, sink, tracker)
        })
    }

    /// Acquire the sink with `connect`, hold it for the whole run and drop it on return
    pub fn run_with<S, F>(&self, source: &impl Source, connect: F) -> Result<LoadSummary>
    where
        S: Sink,
        F: FnOnce() -> Result<S>,
    {
        self.track(|tracker| {
            self.check_order()?;
            tracker.enter(RunState::Connecting);
            let mut sink = connect()?;
            self.execute(source, &mut sink, tracker)
        })
    }

    fn check_order(&self) -> Result<()> {
        DependencyResolver::new()
            .check_order(&self.table_order())
            .map_err(PipelineError::Dependency)
    }

    fn track<F>(&self, body: F) -> Result<LoadSummary>
    where
        F: FnOnce(&mut StateTracker) -> Result<LoadSummary>,
    {
        let started = Instant::now();
        let mut tracker = StateTracker::new();

        match body(&mut tracker) {
            Ok(summary) => {
                tracker.enter(RunState::Done);
                info!(
                    tables = summary.tables.len(),
                    rows = summary.total_rows(),
                    warnings = summary.warnings.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Pipeline completed"
                );
                Ok(summary)
            }
            Err(err) => {
                tracker.fail(&err);
                Err(err)
            }
        }
    }

    fn execute<S: Sink>(
        &self,
        source: &impl Source,
        sink: &mut S,
        tracker: &mut StateTracker,
    ) -> Result<LoadSummary> {
        let mut transformed: Vec<Table> = Vec::with_capacity(self.steps.len());
        let mut warnings = Vec::new();

        for step in &self.steps {
            let name = step.schema.name;

            tracker.enter(RunState::Reading(name));
            let table = source.read(step.schema)?;

            tracker.enter(RunState::Transforming(name));
            let mut ctx = StepContext::new(&transformed);
            let table = (step.transform)(table, &mut ctx)?;
            warnings.extend(ctx.into_warnings());

            info!(table = name, rows = table.len(), "Transformed table");
            transformed.push(table);
        }

        let mut tables = Vec::with_capacity(transformed.len());
        for (step, table) in self.steps.iter().zip(&transformed) {
            tracker.enter(RunState::Loading(step.schema.name));
            let rows = sink.append(table)?;
            tables.push((step.schema.name, rows));
        }

        Ok(LoadSummary { tables, warnings })
    }
}

/// Connect to the configured database and load the configured CSV files
pub fn run_from_config(config: &Config) -> Result<LoadSummary> {
    info!(
        sources = %config.sources.directory.display(),
        database = %config.database.path.display(),
        "Starting pipeline"
    );
    let source = CsvSource::new(&config.sources);
    Pipeline::standard().run_with(&source, || SqliteSink::connect(&config.database))
}
