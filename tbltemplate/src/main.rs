//! Spreadsheet template generator.
//!
//! Connects to a PostgreSQL database, resolves the requested tables of one
//! schema, and writes a spreadsheet with one sheet per table whose single
//! row holds the table's column names.
//!
//! # Security Guarantees
//! - Read-only catalog queries only
//! - Password prompted on the terminal, never a flag, never logged

use clap::Parser;
use std::process::ExitCode;
use tbltemplate::{Cli, Settings, run, summary_lines};
use tbltemplate_core::{Result, init_logging, security::PromptCredentials};
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> Result<()> {
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let settings = Settings::from_cli(cli)?;
    let summary = run(&settings, PromptCredentials).await?;

    if !cli.global.quiet {
        for line in summary_lines(&summary) {
            println!("{}", line);
        }
    }

    Ok(())
}
