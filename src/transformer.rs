//! Line transformer: the fixed record grammar.
//!
//! ```text
//! YYYY-MM-DDThh:mm:ss.<digits> <ws>-<ws> LEVEL <ws>-<ws> message
//! ```
//!
//! The pattern is anchored at both ends. Digits are ASCII only, the level is
//! one or more `A-Z`, and the message takes the rest of the line, so dashes
//! inside the message never break a match. Anything else is "no match",
//! which is a normal outcome rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::LogRecord;

static RECORD_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2})T([0-9]{2}:[0-9]{2}:[0-9]{2})\.[0-9]+\s*-\s*([A-Z]+)\s*-\s*(.*)$",
    )
    .expect("record grammar is a valid regex")
});

/// Parse a raw line into its record fields, or `None` if the grammar does
/// not match.
pub fn parse_record(line: &str) -> Option<LogRecord<'_>> {
    let caps = RECORD_GRAMMAR.captures(line)?;
    Some(LogRecord {
        date: caps.get(1)?.as_str(),
        time: caps.get(2)?.as_str(),
        level: caps.get(3)?.as_str(),
        message: caps.get(4)?.as_str(),
    })
}

/// Reformat a raw line to `"{date} {time} {level} {message}"`.
///
/// Returns `None` when the line is not a log record.
pub fn transform_line(line: &str) -> Option<String> {
    parse_record(line).map(|record| record.to_string())
}
