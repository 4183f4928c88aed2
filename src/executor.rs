//! Streaming line executor.
//!
//! Pushes each raw line through the entire stage chain before reading the
//! next one, and writes whatever survives to the sink immediately. Only one
//! line is held in memory at a time, and output order is input order.

use crate::error::ExtractError;
use crate::sink::LineSink;
use crate::stage::{DATE_STAGE, LineStage};

/// How many lines got past one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    pub name: String,
    pub passed: usize,
}

/// Counters for one streaming pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Raw lines pulled from the source.
    pub lines_read: usize,
    /// Lines written to the sink.
    pub records_written: usize,
    /// Pass counts per stage, in chain order.
    pub stages: Vec<StageCount>,
}

impl RunStats {
    fn for_stages(stages: &[Box<dyn LineStage>]) -> Self {
        Self {
            lines_read: 0,
            records_written: 0,
            stages: stages
                .iter()
                .map(|s| StageCount {
                    name: s.name().to_string(),
                    passed: 0,
                })
                .collect(),
        }
    }

    /// Lines that got past the stage called `name`.
    pub fn passed(&self, name: &str) -> Option<usize> {
        self.stages.iter().find(|s| s.name == name).map(|s| s.passed)
    }

    /// Lines that started with the target date, records or not.
    ///
    /// Zero when the chain has no date stage.
    pub fn prefix_matches(&self) -> usize {
        self.passed(DATE_STAGE).unwrap_or(0)
    }

    /// Lines for the target date that were not valid records.
    pub fn malformed(&self) -> usize {
        self.prefix_matches().saturating_sub(self.records_written)
    }
}

/// Push a line through every stage, stopping at the first one that drops it.
fn push_through_stages(
    line: String,
    stages: &mut [Box<dyn LineStage>],
    counts: &mut [StageCount],
) -> Option<String> {
    let mut current = line;
    for (stage, count) in stages.iter_mut().zip(counts.iter_mut()) {
        current = stage.process(current)?;
        count.passed += 1;
    }
    Some(current)
}

/// Stream `lines` through `stages` into `sink`.
///
/// The first error from the source or the sink aborts the pass and is
/// returned as is. Lines already written stay written.
pub fn execute_streaming<I, S>(
    lines: I,
    stages: &mut [Box<dyn LineStage>],
    sink: &mut S,
) -> Result<RunStats, ExtractError>
where
    I: IntoIterator<Item = Result<String, ExtractError>>,
    S: LineSink + ?Sized,
{
    let mut stats = RunStats::for_stages(stages);

    for line in lines {
        let line = line?;
        stats.lines_read += 1;

        match push_through_stages(line, stages, &mut stats.stages) {
            Some(out) => {
                sink.write_line(&out)?;
                stats.records_written += 1;
            }
            None => tracing::trace!(line = stats.lines_read, "line dropped"),
        }
    }

    Ok(stats)
}
