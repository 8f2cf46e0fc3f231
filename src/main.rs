use anyhow::{anyhow, Context, Result};
use retail_loader::{
    cli::{Cli, Commands},
    config::Config,
    logging,
    pipeline::run_from_config,
    schema::DependencyResolver,
};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    match cli.command() {
        Commands::Run => {
            let config = Config::discover(cli.config.as_deref())
                .context("Failed to load configuration")?;
            let _guard = logging::init(&config.logging)?;

            // Failures are already logged by the pipeline
            match run_from_config(&config) {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }

        Commands::ListTables => {
            let tables = DependencyResolver::new()
                .load_order()
                .map_err(|e| anyhow!(e))?;

            println!("Tables in load order:\n");
            for table in tables {
                let parents: Vec<_> = table
                    .foreign_keys
                    .iter()
                    .map(|fk| format!("{}.{}", fk.references_table, fk.references_column))
                    .collect();
                if parents.is_empty() {
                    println!("  {}", table.name);
                } else {
                    println!("  {} -> {}", table.name, parents.join(", "));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
