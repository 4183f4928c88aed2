//! Error type for log extraction.
//!
//! Every fatal condition of a run maps to one [`ExtractError`] variant.
//! A date with no matching records is *not* an error; see
//! [`Outcome::NoLogs`](crate::run::Outcome::NoLogs).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::run::Phase;

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Bad command-line input, detected before any I/O.
    #[error("usage: {0}")]
    Usage(String),

    /// The executable's own location could not be determined.
    #[error("cannot locate the running executable: {0}")]
    ResolveExe(#[source] io::Error),

    #[error("cannot open input file '{}': {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading input file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output directory '{}': {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output file '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot remove empty output file '{}': {source}", .path.display())]
    RemoveOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An [`Extraction`](crate::run::Extraction) step was called out of order.
    #[error("cannot {action} an extraction in phase {phase:?}")]
    PhaseOrder { action: &'static str, phase: Phase },

    /// Renaming a staged output file into place failed.
    #[error("cannot move staged output into '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExtractError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExtractError::Usage(_) => 2,
            _ => 1,
        }
    }

    /// True for errors raised by the filesystem rather than by the caller.
    pub fn is_io(&self) -> bool {
        !matches!(
            self,
            ExtractError::Usage(_) | ExtractError::PhaseOrder { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_exit_code() {
        let err = ExtractError::Usage("missing date".to_string());
        assert_eq!(err.exit_code(), 2);
        assert!(!err.is_io());
    }

    #[test]
    fn test_io_exit_code() {
        let err = ExtractError::OpenInput {
            path: PathBuf::from("/nope/logs_2024.log"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.is_io());
    }

    #[test]
    fn test_phase_order_is_not_io() {
        let err = ExtractError::PhaseOrder {
            action: "finalize",
            phase: Phase::Init,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "cannot finalize an extraction in phase Init");
    }

    #[test]
    fn test_display_names_path() {
        let err = ExtractError::Write {
            path: PathBuf::from("out/output_2024-12-02.txt"),
            source: io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out/output_2024-12-02.txt"));
        assert!(msg.contains("disk full"));
    }
}
