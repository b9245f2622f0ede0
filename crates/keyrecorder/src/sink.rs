//! Append-only keystroke log.
//!
//! Each event becomes one line, `YYYY-MM-DD HH:MM:SS <token>\n`, in local
//! time. Lines are written straight to the file handle without an
//! application-side buffer, so everything recorded has reached the OS when
//! [`LogSink::record`] returns. The file is only created once the first
//! event arrives.

use std::fmt::{self, Write as _};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::event::KeyEvent;

/// `strftime` format of the line timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format one log line for `token` captured at `timestamp`.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the line cannot be formatted.
pub fn format_line<Tz>(timestamp: &DateTime<Tz>, token: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut line = String::new();
    writeln!(line, "{} {token}", timestamp.format(TIMESTAMP_FORMAT))?;
    Ok(line)
}

/// Opens the writer behind a [`LogSink`] on first use.
pub type Opener<W> = fn(&Path) -> io::Result<W>;

/// Open `path` for appending, creating it if it is missing.
///
/// Existing content is never truncated.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be created or opened.
pub fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Owner of the log file handle.
///
/// The file is opened lazily by the first [`LogSink::record`] call. If that
/// fails the event is dropped and the next call tries again.
pub struct LogSink<W = File> {
    writer: Option<W>,
    open: Opener<W>,
    path: PathBuf,
    mid_line: bool,
}

impl LogSink<File> {
    /// Create a sink for the log file at `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_opener(path, open_append)
    }
}

impl<W: Write> LogSink<W> {
    /// Create a sink that opens its writer through `open` on first use.
    pub fn with_opener(path: impl Into<PathBuf>, open: Opener<W>) -> Self {
        Self {
            writer: None,
            open,
            path: path.into(),
            mid_line: false,
        }
    }

    /// Wrap an already-open writer. `path` is only used in diagnostics.
    pub fn from_writer(writer: W, path: impl Into<PathBuf>) -> Self {
        Self {
            writer: Some(writer),
            open: already_open,
            path: path.into(),
            mid_line: false,
        }
    }

    /// Append the line for `event`, displayed as `token`.
    ///
    /// A line cut short by an earlier failed write is terminated before the
    /// new line is written, so every complete line stays parseable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the line cannot be formatted,
    /// [`Error::LogOpen`] if the log cannot be opened and [`Error::LogWrite`]
    /// if the write fails. Nothing is retried.
    pub fn record(&mut self, event: &KeyEvent, token: &str) -> Result<()> {
        let line = format_line(&event.timestamp, token)?;

        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open_writer()?,
        };
        let writer = self.writer.insert(writer);

        write_line(writer, &mut self.mid_line, &line).map_err(|source| {
            if self.mid_line {
                warn!(path = %self.path.display(), "Log line left incomplete");
            }
            Error::LogWrite {
                path: self.path.clone(),
                source,
            }
        })?;

        trace!(key_code = %event.key_code, kind = %event.kind, "Recorded event");
        Ok(())
    }

    /// Whether the writer has been opened.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the underlying writer, if it is open.
    #[must_use]
    pub fn get_ref(&self) -> Option<&W> {
        self.writer.as_ref()
    }

    fn open_writer(&self) -> Result<W> {
        let open_err = |source| Error::LogOpen {
            path: self.path.clone(),
            source,
        };

        let existed = self.path.try_exists().map_err(open_err)?;
        let writer = (self.open)(&self.path).map_err(open_err)?;

        if existed {
            debug!(path = %self.path.display(), "Appending to existing log file");
        } else {
            info!(path = %self.path.display(), "Log file created successfully");
        }
        Ok(writer)
    }
}

impl<W> fmt::Debug for LogSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("path", &self.path)
            .field("open", &self.writer.is_some())
            .field("mid_line", &self.mid_line)
            .finish_non_exhaustive()
    }
}

fn already_open<W>(path: &Path) -> io::Result<W> {
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("writer for {} was closed", path.display()),
    ))
}

/// Write `line` in as few calls as the writer allows, then flush.
///
/// `mid_line` tracks whether the last byte that reached the writer was
/// something other than a newline. When it is set on entry, a `\n` goes out
/// first to close off the fragment.
fn write_line<W: Write>(writer: &mut W, mid_line: &mut bool, line: &str) -> io::Result<()> {
    let mut buf = Vec::with_capacity(line.len() + 1);
    if *mid_line {
        buf.push(b'\n');
    }
    buf.extend_from_slice(line.as_bytes());

    let mut rest = buf.as_slice();
    while !rest.is_empty() {
        match writer.write(rest) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole log line",
                ))
            }
            Ok(n) => {
                *mid_line = rest[n - 1] != b'\n';
                rest = &rest[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, KeyCode};
    use chrono::{Local, Utc};
    use std::fs;

    /// Accepts at most `chunk` bytes per call.
    #[derive(Debug, Default)]
    struct Trickle {
        chunk: usize,
        written: Vec<u8>,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn event_at_noon(code: u16) -> KeyEvent {
        let timestamp = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        KeyEvent::at(KeyCode(code), EventKind::KeyDown, timestamp)
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn memory_contents(sink: &LogSink<Vec<u8>>) -> String {
        String::from_utf8(sink.get_ref().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_format_line() {
        let timestamp = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_line(&timestamp, "a").unwrap(), "2024-01-01 12:00:00 a\n");
    }

    #[test]
    fn test_format_line_other_timezone() {
        let timestamp = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            format_line(&timestamp, "<escape>").unwrap(),
            "2023-12-31 23:59:59 <escape>\n"
        );
    }

    #[test]
    fn test_format_line_empty_token() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_line(&timestamp, "").unwrap(), "2024-01-01 00:00:00 \n");
    }

    #[test]
    fn test_format_line_reproducible() {
        let timestamp = Local.with_ymd_and_hms(2024, 6, 15, 8, 5, 3).unwrap();
        let mut sink = LogSink::from_writer(Vec::new(), "memory");
        sink.record(&KeyEvent::at(KeyCode(49), EventKind::KeyDown, timestamp), "<space>")
            .unwrap();

        let expected = format_line(&timestamp, "<space>").unwrap();
        assert_eq!(memory_contents(&sink), expected);
    }

    #[test]
    fn test_record_preserves_order() {
        let mut sink = LogSink::from_writer(Vec::new(), "memory");
        sink.record(&event_at_noon(0), "a").unwrap();
        sink.record(&event_at_noon(1), "s").unwrap();

        assert_eq!(
            memory_contents(&sink),
            "2024-01-01 12:00:00 a\n2024-01-01 12:00:00 s\n"
        );
    }

    #[test]
    fn test_new_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystroke.log");

        let sink = LogSink::new(&path);
        assert!(!sink.is_open());
        assert!(!path.exists());
    }

    #[test]
    fn test_first_record_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystroke.log");

        let mut sink = LogSink::new(&path);
        assert_eq!(sink.path(), path.as_path());

        sink.record(&event_at_noon(0), "a").unwrap();
        assert!(sink.is_open());
        assert_eq!(read_lines(&path), vec!["2024-01-01 12:00:00 a"]);
    }

    #[test]
    fn test_reopen_appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystroke.log");
        let prior = "2023-01-01 00:00:01 h\n2023-01-01 00:00:02 i\n2023-01-01 00:00:03 <space>\n";
        fs::write(&path, prior).unwrap();

        let mut sink = LogSink::new(&path);
        sink.record(&event_at_noon(53), "<escape>").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[..3],
            [
                "2023-01-01 00:00:01 h",
                "2023-01-01 00:00:02 i",
                "2023-01-01 00:00:03 <space>"
            ]
        );
        assert_eq!(lines[3], "2024-01-01 12:00:00 <escape>");
    }

    #[test]
    fn test_two_sinks_in_sequence_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystroke.log");

        LogSink::new(&path).record(&event_at_noon(0), "a").unwrap();
        LogSink::new(&path).record(&event_at_noon(1), "s").unwrap();

        assert_eq!(
            read_lines(&path),
            vec!["2024-01-01 12:00:00 a", "2024-01-01 12:00:00 s"]
        );
    }

    #[test]
    fn test_open_missing_directory_fails_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("keystroke.log");
        let mut sink = LogSink::new(&path);

        for code in [0, 1] {
            let err = sink.record(&event_at_noon(code), "a").unwrap_err();
            assert!(matches!(err, Error::LogOpen { .. }));
            assert!(err.to_string().contains("keystroke.log"));
        }
        assert!(!sink.is_open());
    }

    #[test]
    fn test_open_retried_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later").join("keystroke.log");
        let mut sink = LogSink::new(&path);

        assert!(sink.record(&event_at_noon(0), "a").is_err());

        fs::create_dir(dir.path().join("later")).unwrap();
        sink.record(&event_at_noon(1), "s").unwrap();
        assert_eq!(read_lines(&path), vec!["2024-01-01 12:00:00 s"]);
    }

    #[test]
    fn test_custom_opener_used_lazily() {
        let mut sink = LogSink::<Vec<u8>>::with_opener("memory", |_| Ok(Vec::new()));
        assert!(sink.get_ref().is_none());

        sink.record(&event_at_noon(0), "a").unwrap();
        assert_eq!(memory_contents(&sink), "2024-01-01 12:00:00 a\n");
    }

    #[test]
    fn test_short_writes_complete_the_line() {
        let mut sink = LogSink::from_writer(
            Trickle {
                chunk: 3,
                written: Vec::new(),
            },
            "trickle",
        );
        sink.record(&event_at_noon(0), "a").unwrap();
        sink.record(&event_at_noon(1), "s").unwrap();

        assert_eq!(
            sink.get_ref().unwrap().written,
            b"2024-01-01 12:00:00 a\n2024-01-01 12:00:00 s\n"
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = LogSink::from_writer(Broken, "broken.log");
        let err = sink.record(&event_at_noon(0), "a").unwrap_err();
        assert!(matches!(err, Error::LogWrite { .. }));
        assert!(err.to_string().contains("broken.log"));
    }
}
