//! Line stages and their implementations.
//!
//! A `LineStage` takes one raw line and either passes a (possibly rewritten)
//! line downstream or drops it. Extraction is the two-stage chain built by
//! [`extraction_stages`]:
//!
//! ```text
//! DATE <target> | REFORMAT
//! ```
//!
//! `DATE` is a cheap literal prefix check, so `REFORMAT` only ever sees lines
//! for the target date.

use crate::transformer::transform_line;

/// Name of the [`DatePrefixStage`].
pub const DATE_STAGE: &str = "DATE";
/// Name of the [`ReformatStage`].
pub const REFORMAT_STAGE: &str = "REFORMAT";

/// A pipeline stage that processes lines one at a time.
pub trait LineStage {
    /// Process one line, returning the line to pass on or `None` to drop it.
    fn process(&mut self, line: String) -> Option<String>;

    /// The display name of this stage.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Stage implementations
// ---------------------------------------------------------------------------

/// DATE "prefix" - keeps lines that start with the target date text.
///
/// The comparison is byte equality on the leading characters. The prefix is
/// never parsed as a calendar date.
pub struct DatePrefixStage {
    prefix: String,
}

impl DatePrefixStage {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl LineStage for DatePrefixStage {
    fn process(&mut self, line: String) -> Option<String> {
        if line.starts_with(self.prefix.as_str()) {
            Some(line)
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        DATE_STAGE
    }
}

/// REFORMAT - rewrites log records to `date time LEVEL message`, drops the rest.
pub struct ReformatStage;

impl LineStage for ReformatStage {
    fn process(&mut self, line: String) -> Option<String> {
        transform_line(&line)
    }

    fn name(&self) -> &str {
        REFORMAT_STAGE
    }
}

/// Build the stage chain that extracts `target_date` records.
pub fn extraction_stages(target_date: &str) -> Vec<Box<dyn LineStage>> {
    vec![
        Box::new(DatePrefixStage::new(target_date)),
        Box::new(ReformatStage),
    ]
}
