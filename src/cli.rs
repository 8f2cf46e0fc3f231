use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "retail-loader")]
#[command(version, about = "Validate retail CSV datasets and load them into SQLite")]
pub struct Cli {
    /// Config file (default: ./pipeline.toml, then the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Read, validate and load every table (default)
    Run,

    /// List tables in load order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_runs_pipeline() {
        let cli = Cli::try_parse_from(["retail-loader"]).unwrap();
        assert_eq!(cli.command(), Commands::Run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["retail-loader", "run", "--config", "etc/load.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("etc/load.toml")));
    }
}
