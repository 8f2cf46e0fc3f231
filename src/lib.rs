pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod table;
pub mod transform;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ConfigError, PipelineError, Result};
pub use pipeline::{run_from_config, LoadSummary, Pipeline, RunState};
