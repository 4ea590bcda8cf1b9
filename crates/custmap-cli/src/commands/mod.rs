//! Command implementations

mod config;
mod customers;
mod edit;
mod reverse;
mod search;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Customers(args) => customers::execute(args, &output).await,
        Commands::Search(args) => search::execute(args, &config, &output).await,
        Commands::Reverse(args) => reverse::execute(args, &config, &output).await,
        Commands::Edit(args) => edit::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}
