//! # log-extract
//!
//! Streaming extraction of one day's entries from a large append-only log.
//!
//! ## Overview
//!
//! The input is read once, line by line, and never held in memory:
//! - **Line source**: splits the file on `\n` / `\r\n`
//! - **Date prefix stage**: keeps lines starting with the target date text
//! - **Reformat stage**: rewrites `YYYY-MM-DDThh:mm:ss.fff - LEVEL - msg`
//!   as `YYYY-MM-DD hh:mm:ss LEVEL msg` and drops non-records
//! - **Output sink**: appends survivors to `output_<date>.txt`, removed
//!   again if nothing matched
//!
//! ## Example
//!
//! ```
//! use log_extract::{execute_streaming, extraction_stages, transform_line};
//!
//! assert_eq!(
//!     transform_line("2024-12-02T02:23:37.0000 - DEBUG - Cache cleared successfully.")
//!         .as_deref(),
//!     Some("2024-12-02 02:23:37 DEBUG Cache cleared successfully."),
//! );
//!
//! let lines = vec![
//!     Ok("2024-12-01T09:00:00.0 - INFO - not today".to_string()),
//!     Ok("2024-12-02T09:00:00.0 - INFO - today".to_string()),
//! ];
//! let mut stages = extraction_stages("2024-12-02");
//! let mut out: Vec<String> = Vec::new();
//! let stats = execute_streaming(lines, &mut stages, &mut out).unwrap();
//!
//! assert_eq!(out, vec!["2024-12-02 09:00:00 INFO today"]);
//! assert_eq!(stats.records_written, 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod line_source;
pub mod logging;
pub mod record;
pub mod run;
pub mod sink;
pub mod stage;
pub mod transformer;

pub use cli::Cli;
pub use config::{ExtractConfig, output_file_name};
pub use error::ExtractError;
pub use executor::{RunStats, StageCount, execute_streaming};
pub use line_source::LineSource;
pub use record::LogRecord;
pub use run::{Extraction, Outcome, Phase, run};
pub use sink::{LineSink, OutputSink, SinkOutcome};
pub use stage::{
    DATE_STAGE, DatePrefixStage, LineStage, REFORMAT_STAGE, ReformatStage, extraction_stages,
};
pub use transformer::{parse_record, transform_line};
