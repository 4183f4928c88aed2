//! Run configuration and path resolution.
//!
//! By default the input log sits one directory above the executable and is
//! named for the current year; output goes to an `output` directory next to
//! the input file:
//!
//! ```text
//! <root>/
//! ├── bin/extract-logs
//! ├── logs_<YEAR>.log
//! └── output/
//!     └── output_<DATE>.txt
//! ```

use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::error::ExtractError;

/// Name of the directory that receives per-date output files.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Everything one extraction run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Literal prefix that selects lines. Never parsed as a date.
    pub target_date: String,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Stage output in a temp file and rename into place on success.
    pub atomic: bool,
}

impl ExtractConfig {
    /// Configure a run against an explicit input file.
    ///
    /// The output directory defaults to `output/` next to `input_path`.
    pub fn new(
        target_date: impl Into<String>,
        input_path: impl Into<PathBuf>,
    ) -> Result<Self, ExtractError> {
        let target_date = target_date.into();
        validate_target_date(&target_date)?;
        let input_path = input_path.into();
        let output_dir = default_output_dir(&input_path);
        Ok(Self {
            target_date,
            input_path,
            output_dir,
            atomic: false,
        })
    }

    /// Configure a run against this year's log file beside the executable.
    pub fn from_exe_location(target_date: impl Into<String>) -> Result<Self, ExtractError> {
        let target_date = target_date.into();
        validate_target_date(&target_date)?;
        let exe = std::env::current_exe().map_err(ExtractError::ResolveExe)?;
        let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let year = chrono::Local::now().year();
        Self::new(target_date, default_input_path(exe_dir, year))
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Full path of the output file for this run's date.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(output_file_name(&self.target_date))
    }
}

/// `logs_<year>.log`
pub fn input_file_name(year: i32) -> String {
    format!("logs_{year}.log")
}

/// `output_<date>.txt`
pub fn output_file_name(target_date: &str) -> String {
    format!("output_{target_date}.txt")
}

/// The year's log file in the parent of `exe_dir`.
pub fn default_input_path(exe_dir: &Path, year: i32) -> PathBuf {
    let root = match exe_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => exe_dir.join(".."),
    };
    root.join(input_file_name(year))
}

/// `output/` in the same directory as `input_path`.
pub fn default_output_dir(input_path: &Path) -> PathBuf {
    match input_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(OUTPUT_DIR_NAME),
        _ => PathBuf::from(OUTPUT_DIR_NAME),
    }
}

/// Reject dates that cannot be used inside an output file name.
///
/// Only file-name safety is checked. The date is deliberately not checked for
/// calendar validity; it is matched as literal text.
pub fn validate_target_date(target_date: &str) -> Result<(), ExtractError> {
    if target_date.is_empty() {
        return Err(ExtractError::Usage(
            "target date must not be empty".to_string(),
        ));
    }
    if target_date.contains(['/', '\\', '\0']) {
        return Err(ExtractError::Usage(format!(
            "target date '{}' must not contain path separators",
            target_date.escape_default()
        )));
    }
    Ok(())
}
