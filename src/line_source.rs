//! Line source: lazily split an input byte stream into raw lines.
//!
//! `\n`, `\r\n` and a lone `\r` each terminate a line, and the terminator
//! is not part of the yielded line. A `\r\n` pair is one break even when it
//! straddles two buffer fills. A final line without a terminator is still yielded if it
//! is non-empty. Lines are decoded as UTF-8; invalid sequences are replaced
//! with U+FFFD rather than aborting the scan.
//!
//! A `LineSource` is single-pass. Re-scanning a file needs a fresh
//! [`LineSource::open`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::ExtractError;

/// Iterator over the raw lines of one input stream.
pub struct LineSource<R> {
    reader: R,
    path: PathBuf,
    buf: Vec<u8>,
    lines_read: usize,
    /// The previous line ended in `\r`; a `\n` right after it belongs to it.
    skip_lf: bool,
    done: bool,
}

impl LineSource<BufReader<File>> {
    /// Open `path` for line-by-line reading.
    ///
    /// Fails with [`ExtractError::OpenInput`] if the file is missing or
    /// unreadable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ExtractError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap an already-open reader. `path` is only used in error messages.
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            buf: Vec::new(),
            lines_read: 0,
            skip_lf: false,
            done: false,
        }
    }

    /// Number of lines yielded so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fill `buf` with the next line, without its terminator.
    ///
    /// Returns `false` at end of input when no bytes were left for a line.
    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let mut partial = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(partial);
            }
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    self.skip_lf = available[end] == b'\r';
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                    partial = true;
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_line() {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => {
                self.lines_read += 1;
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(source) => {
                // A failed read ends the sequence; the caller aborts the run.
                self.done = true;
                Some(Err(ExtractError::Read {
                    path: self.path.clone(),
                    source,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn collect(input: &[u8]) -> Vec<String> {
        LineSource::new(Cursor::new(input.to_vec()), "test.log")
            .map(|line| line.unwrap())
            .collect()
    }

    #[test]
    fn test_lf_lines() {
        assert_eq!(collect(b"a\nb\nc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(collect(b"a\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(collect(b"a\r\nb\nc\r\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_partial_line() {
        assert_eq!(collect(b"a\nlast"), vec!["a", "last"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn test_blank_lines_are_yielded() {
        assert_eq!(collect(b"\n\na\n"), vec!["", "", "a"]);
    }

    #[test]
    fn test_lone_cr_terminates() {
        assert_eq!(collect(b"a\rb\n"), vec!["a", "b"]);
        assert_eq!(collect(b"a\rb\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_cr_then_crlf_is_two_breaks() {
        assert_eq!(collect(b"a\r\r\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_lf_then_cr_is_two_breaks() {
        assert_eq!(collect(b"a\n\rb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_crlf_split_across_buffer_fills() {
        // One-byte buffer: `\r` and `\n` always arrive in separate fills.
        let input = Cursor::new(b"ab\r\ncd\r\n\ref".to_vec());
        let reader = io::BufReader::with_capacity(1, input);
        let lines: Vec<String> = LineSource::new(reader, "tiny.log")
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(lines, vec!["ab", "cd", "", "ef"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(collect(b"ok\xff\n"), vec!["ok\u{fffd}"]);
    }

    #[test]
    fn test_counts_lines() {
        let mut source = LineSource::new(Cursor::new(b"x\ny\n".to_vec()), "test.log");
        assert_eq!(source.lines_read(), 0);
        source.next();
        source.next();
        assert!(source.next().is_none());
        assert_eq!(source.lines_read(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs_2024.log");
        match LineSource::open(&path) {
            Err(ExtractError::OpenInput { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing file must fail"),
        }
    }

    /// Reader that yields one chunk and then fails.
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device gone"));
            }
            self.served = true;
            let data = b"first\nsec";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_read_error_ends_sequence() {
        let reader = io::BufReader::new(FailingReader { served: false });
        let mut source = LineSource::new(reader, "broken.log");
        assert_eq!(source.next().unwrap().unwrap(), "first");
        assert!(matches!(source.next(), Some(Err(ExtractError::Read { .. }))));
        assert!(source.next().is_none());
    }
}
