//! The extraction run.
//!
//! A run moves through fixed phases:
//!
//! ```text
//! Init ──► Streaming ──► Finalizing ──► Done        (records written)
//!                                   └─► DoneEmpty   (output removed)
//! ```
//!
//! The output file is created before streaming and its fate is decided only
//! once the input is exhausted, because the match count is unknown until
//! then. Any I/O error aborts the run where it happened.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::executor::{RunStats, execute_streaming};
use crate::line_source::LineSource;
use crate::sink::{OutputSink, SinkOutcome};
use crate::stage::{LineStage, extraction_stages};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Streaming,
    Finalizing,
    Done,
    DoneEmpty,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one record was extracted into `output`.
    Extracted { output: PathBuf, stats: RunStats },
    /// No record matched the date; no output file remains.
    NoLogs { stats: RunStats },
}

impl Outcome {
    pub fn stats(&self) -> &RunStats {
        match self {
            Outcome::Extracted { stats, .. } | Outcome::NoLogs { stats } => stats,
        }
    }

    /// Terminal phase this outcome corresponds to.
    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Extracted { .. } => Phase::Done,
            Outcome::NoLogs { .. } => Phase::DoneEmpty,
        }
    }

    pub fn found(&self) -> bool {
        matches!(self, Outcome::Extracted { .. })
    }
}

/// One in-flight extraction: an open input, an open output and the stages
/// between them.
pub struct Extraction {
    config: ExtractConfig,
    source: LineSource<BufReader<File>>,
    stages: Vec<Box<dyn LineStage>>,
    sink: OutputSink,
    stats: RunStats,
    phase: Phase,
}

impl Extraction {
    /// Open the input, ensure the output directory exists and create the
    /// output file.
    ///
    /// The input is opened first so a missing log file leaves no empty
    /// output behind.
    pub fn init(config: ExtractConfig) -> Result<Self, ExtractError> {
        tracing::debug!(
            phase = ?Phase::Init,
            date = %config.target_date,
            input = %config.input_path.display(),
            "starting extraction"
        );

        let source = LineSource::open(&config.input_path)?;

        fs::create_dir_all(&config.output_dir).map_err(|source| {
            ExtractError::CreateOutputDir {
                path: config.output_dir.clone(),
                source,
            }
        })?;

        let output_path = config.output_path();
        let sink = if config.atomic {
            OutputSink::create_staged(output_path)?
        } else {
            OutputSink::create(output_path)?
        };
        let stages = extraction_stages(&config.target_date);

        Ok(Self {
            config,
            source,
            stages,
            sink,
            stats: RunStats::default(),
            phase: Phase::Init,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Stream every input line through the stages into the output file.
    ///
    /// Only valid once, straight after [`init`](Self::init). A failed stream
    /// leaves the extraction in `Streaming`, where nothing more can be done
    /// with it.
    pub fn stream(&mut self) -> Result<(), ExtractError> {
        self.expect_phase(Phase::Init, "stream")?;
        self.phase = Phase::Streaming;
        tracing::debug!(
            phase = ?self.phase,
            staged = self.sink.is_staged(),
            output = %self.sink.path().display(),
            "streaming"
        );

        match execute_streaming(&mut self.source, &mut self.stages, &mut self.sink) {
            Ok(stats) => {
                self.stats = stats;
                self.phase = Phase::Finalizing;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    lines_read = self.source.lines_read(),
                    lines_written = self.sink.lines_written(),
                    "extraction aborted: {err}"
                );
                Err(err)
            }
        }
    }

    /// Close the output and keep it only if something was written.
    ///
    /// Only valid after a successful [`stream`](Self::stream); the match
    /// count is meaningless before the input is exhausted.
    pub fn finalize(self) -> Result<Outcome, ExtractError> {
        self.expect_phase(Phase::Finalizing, "finalize")?;
        let Extraction {
            config,
            sink,
            stats,
            ..
        } = self;
        tracing::debug!(phase = ?Phase::Finalizing, "finalizing output");

        let outcome = match sink.finish()? {
            SinkOutcome::Kept(output) => Outcome::Extracted { output, stats },
            SinkOutcome::Removed => Outcome::NoLogs { stats },
        };

        let stats = outcome.stats();
        tracing::info!(
            phase = ?outcome.phase(),
            date = %config.target_date,
            lines_read = stats.lines_read,
            prefix_matches = stats.prefix_matches(),
            malformed = stats.malformed(),
            records_written = stats.records_written,
            "extraction finished"
        );
        Ok(outcome)
    }

    fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<(), ExtractError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(ExtractError::PhaseOrder {
                action,
                phase: self.phase,
            })
        }
    }
}

/// Run a whole extraction: init, stream, finalize.
pub fn run(config: ExtractConfig) -> Result<Outcome, ExtractError> {
    let mut extraction = Extraction::init(config)?;
    extraction.stream()?;
    extraction.finalize()
}
