//! Command-line interface for `extract-logs`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ExtractConfig;
use crate::error::ExtractError;

/// Extract one day's entries from the yearly log file.
///
/// Matching lines are reformatted to `YYYY-MM-DD hh:mm:ss LEVEL message` and
/// written to `output/output_<DATE>.txt`. If nothing matches, no output file
/// is left behind.
#[derive(Debug, Parser)]
#[command(name = "extract-logs", version)]
pub struct Cli {
    /// Date to extract, matched literally against the start of each line (e.g. 2024-12-02)
    pub date: String,

    /// Read this log file instead of ../logs_<YEAR>.log next to the executable
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write output here instead of `output/` beside the input file
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write to a temporary file and move it into place only on success
    #[arg(long)]
    pub atomic: bool,

    /// Increase diagnostic logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the run configuration, resolving default paths.
    pub fn to_config(&self) -> Result<ExtractConfig, ExtractError> {
        let config = match &self.input {
            Some(input) => ExtractConfig::new(self.date.clone(), input.clone())?,
            None => ExtractConfig::from_exe_location(self.date.clone())?,
        };
        let config = match &self.output_dir {
            Some(dir) => config.with_output_dir(dir.clone()),
            None => config,
        };
        Ok(config.with_atomic(self.atomic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_missing_date_is_usage_error() {
        let err = Cli::try_parse_from(["extract-logs"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_parse_date_only() {
        let cli = Cli::try_parse_from(["extract-logs", "2024-12-02"]).unwrap();
        assert_eq!(cli.date, "2024-12-02");
        assert!(cli.input.is_none());
        assert!(cli.output_dir.is_none());
        assert!(!cli.atomic);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "extract-logs",
            "2024-12-02",
            "--input",
            "/data/app.log",
            "-o",
            "/tmp/out",
            "--atomic",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let config = cli.to_config().unwrap();
        assert_eq!(config.input_path, PathBuf::from("/data/app.log"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.atomic);
    }

    #[test]
    fn test_to_config_default_output_dir() {
        let cli =
            Cli::try_parse_from(["extract-logs", "2024-12-02", "-i", "/data/app.log"]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/data/output"));
    }

    #[test]
    fn test_to_config_rejects_path_in_date() {
        let cli = Cli::try_parse_from(["extract-logs", "../etc", "-i", "app.log"]).unwrap();
        assert!(matches!(cli.to_config(), Err(ExtractError::Usage(_))));
    }
}
