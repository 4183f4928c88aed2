//! Output sink for transformed lines.
//!
//! [`OutputSink`] owns the per-date output file. Two modes:
//!
//! - **Direct** (default): the file is truncated and created up front and
//!   lines are appended as they arrive. If nothing was written, the empty file
//!   is deleted on [`OutputSink::finish`]. A failure mid-stream leaves whatever
//!   was already written.
//! - **Staged**: lines go to a temporary file in the same directory, which is
//!   renamed over the output path only if at least one line was written. A
//!   stale output file from an earlier run is removed when nothing matched.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ExtractError;

/// Destination for transformed lines, one line per call.
pub trait LineSink {
    /// Append `line` followed by a single `\n`.
    fn write_line(&mut self, line: &str) -> Result<(), ExtractError>;
}

/// In-memory sink, handy for tests and callers that want the lines back.
impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<(), ExtractError> {
        self.push(line.to_string());
        Ok(())
    }
}

enum SinkWriter {
    Direct(BufWriter<File>),
    Staged(BufWriter<NamedTempFile>),
}

/// What happened to the output file when the sink was finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// At least one line was written; the file is in place at this path.
    Kept(PathBuf),
    /// Nothing was written; no output file remains.
    Removed,
}

/// The per-run output file.
pub struct OutputSink {
    path: PathBuf,
    writer: SinkWriter,
    lines_written: usize,
}

impl OutputSink {
    /// Truncate-create `path` and write to it directly.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| ExtractError::CreateOutput {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: SinkWriter::Direct(BufWriter::new(file)),
            lines_written: 0,
        })
    }

    /// Stage output in a temporary file next to `path`.
    pub fn create_staged(path: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let path = path.into();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".output_")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|source| ExtractError::CreateOutput {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer: SinkWriter::Staged(BufWriter::new(staged)),
            lines_written: 0,
        })
    }

    /// Final location of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn is_staged(&self) -> bool {
        matches!(self.writer, SinkWriter::Staged(_))
    }

    /// Flush and close the sink, keeping the file only if something was written.
    pub fn finish(self) -> Result<SinkOutcome, ExtractError> {
        let OutputSink {
            path,
            writer,
            lines_written,
        } = self;

        match writer {
            SinkWriter::Direct(writer) => {
                let file = writer.into_inner().map_err(|err| ExtractError::Write {
                    path: path.clone(),
                    source: err.into_error(),
                })?;
                drop(file);
                if lines_written == 0 {
                    fs::remove_file(&path).map_err(|source| ExtractError::RemoveOutput {
                        path: path.clone(),
                        source,
                    })?;
                    return Ok(SinkOutcome::Removed);
                }
                Ok(SinkOutcome::Kept(path))
            }
            SinkWriter::Staged(writer) => {
                let staged = writer.into_inner().map_err(|err| ExtractError::Write {
                    path: path.clone(),
                    source: err.into_error(),
                })?;
                if lines_written == 0 {
                    // Dropping the temp file deletes it.
                    drop(staged);
                    remove_stale(&path)?;
                    return Ok(SinkOutcome::Removed);
                }
                staged
                    .persist(&path)
                    .map_err(|err| ExtractError::Persist {
                        path: path.clone(),
                        source: err.error,
                    })?;
                Ok(SinkOutcome::Kept(path))
            }
        }
    }
}

impl LineSink for OutputSink {
    fn write_line(&mut self, line: &str) -> Result<(), ExtractError> {
        let result = match &mut self.writer {
            SinkWriter::Direct(w) => write_terminated(w, line),
            SinkWriter::Staged(w) => write_terminated(w, line),
        };
        result.map_err(|source| ExtractError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.lines_written += 1;
        Ok(())
    }
}

fn write_terminated<W: Write>(w: &mut W, line: &str) -> io::Result<()> {
    w.write_all(line.as_bytes())?;
    w.write_all(b"\n")
}

fn remove_stale(path: &Path) -> Result<(), ExtractError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ExtractError::RemoveOutput {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<String> = Vec::new();
        sink.write_line("a").unwrap();
        sink.write_line("b").unwrap();
        assert_eq!(sink, vec!["a", "b"]);
    }

    #[test]
    fn test_direct_keeps_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        let mut sink = OutputSink::create(&path).unwrap();
        assert!(!sink.is_staged());
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();
        assert_eq!(sink.lines_written(), 2);
        assert_eq!(sink.finish().unwrap(), SinkOutcome::Kept(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_direct_creates_file_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        let sink = OutputSink::create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(sink.finish().unwrap(), SinkOutcome::Removed);
        assert!(!path.exists());
    }

    #[test]
    fn test_direct_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        fs::write(&path, "stale line\nstale line\n").unwrap();
        let mut sink = OutputSink::create(&path).unwrap();
        sink.write_line("fresh").unwrap();
        sink.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_direct_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output_x.txt");
        assert!(matches!(
            OutputSink::create(&path),
            Err(ExtractError::CreateOutput { .. })
        ));
    }

    #[test]
    fn test_staged_not_visible_until_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        let mut sink = OutputSink::create_staged(&path).unwrap();
        assert!(sink.is_staged());
        sink.write_line("one").unwrap();
        assert!(!path.exists());
        assert_eq!(sink.finish().unwrap(), SinkOutcome::Kept(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\n");
        assert!(staged_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_staged_empty_removes_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        fs::write(&path, "stale\n").unwrap();
        let sink = OutputSink::create_staged(&path).unwrap();
        assert_eq!(sink.finish().unwrap(), SinkOutcome::Removed);
        assert!(!path.exists());
        assert!(staged_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_staged_dropped_without_finish_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_2024-12-02.txt");
        let mut sink = OutputSink::create_staged(&path).unwrap();
        sink.write_line("partial").unwrap();
        drop(sink);
        assert!(!path.exists());
        assert!(staged_leftovers(dir.path()).is_empty());
    }
}
