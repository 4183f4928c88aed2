//! CLI tool to extract one day's log entries.
//!
//! Usage:
//!   extract-logs <YYYY-MM-DD>
//!   extract-logs <YYYY-MM-DD> --input app.log -o out/ --atomic
//!
//! Progress and results go to stdout, errors to stderr.

use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log_extract::logging::init_logging;
use log_extract::{Cli, ExtractError, Outcome, run};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(ExtractError::Usage(msg)) => {
            Cli::command().error(ErrorKind::ValueValidation, msg).exit()
        }
        Err(e) => {
            eprintln!("Error during extraction: {e}");
            process::exit(e.exit_code());
        }
    };
    let date = config.target_date.clone();

    println!("Extracting logs for {date}...");

    match run(config) {
        Ok(Outcome::Extracted { output, stats }) => {
            tracing::info!(
                lines_read = stats.lines_read,
                records_written = stats.records_written,
                "done"
            );
            println!(
                "Logs for {date} extracted successfully to {}",
                output.display()
            );
        }
        Ok(Outcome::NoLogs { stats }) => {
            tracing::info!(lines_read = stats.lines_read, "no records for date");
            println!("No logs found for {date}.");
        }
        Err(e) => {
            eprintln!("Error during extraction: {e}");
            process::exit(e.exit_code());
        }
    }
}
