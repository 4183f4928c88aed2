//! Log record view.
//!
//! A [`LogRecord`] borrows its fields from the raw line it was parsed from.
//! It is never stored; the executor formats it straight into the output sink.

use std::fmt;

/// One parsed log line.
///
/// Input shape: `YYYY-MM-DDThh:mm:ss.fff - LEVEL - message`.
/// The fractional seconds are dropped during parsing and have no field here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Calendar date as written in the line, `YYYY-MM-DD`.
    pub date: &'a str,
    /// Wall-clock time, `hh:mm:ss`.
    pub time: &'a str,
    /// Uppercase level token, e.g. `DEBUG`.
    pub level: &'a str,
    /// Everything after the second dash delimiter. May contain spaces and dashes.
    pub message: &'a str,
}

/// Formats as `"{date} {time} {level} {message}"`.
impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.date, self.time, self.level, self.message)
    }
}
