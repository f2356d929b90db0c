//! Run log
//!
//! Every event goes to stdout and is appended to a plain-text log file.
//! The file is reopened in append mode for each event and is never held
//! open between events.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use rdfvec_core::LoggingConfig;

/// Writer factory opening the log file in append mode per event
#[derive(Debug, Clone)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open (creating if needed) for append
    pub fn open(&self) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
    }
}

/// Handle produced for a single event
#[derive(Debug)]
pub enum LogWriter {
    File(File),
    Unavailable(io::ErrorKind),
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(file) => file.write(buf),
            Self::Unavailable(kind) => Err(io::Error::from(*kind)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(file) => file.flush(),
            Self::Unavailable(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for AppendLog {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self.open() {
            Ok(file) => LogWriter::File(file),
            Err(e) => LogWriter::Unavailable(e.kind()),
        }
    }
}

/// Install the global subscriber: stdout plus the append-only log file.
///
/// Fails if the log file cannot be opened for append.
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    let log_file = AppendLog::new(&config.file);
    log_file.open()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_writer(io::stdout),
        )
        .with(
            fmt::layer()
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_ansi(false)
                .with_writer(log_file),
        )
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_across_writers() {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("output.log"));

        log.make_writer().write_all(b"first\n").unwrap();
        log.make_writer().write_all(b"second\n").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_events_are_plain_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("output.log"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_ansi(false)
                .with_writer(log.clone()),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Path exists: /data/go.owl");
            tracing::warn!("second line");
        });

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["Path exists: /data/go.owl", "second line"]);
    }

    #[test]
    fn test_unwritable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("missing").join("output.log"));

        assert!(log.open().is_err());
        assert!(log.make_writer().write(b"lost").is_err());

        let config = LoggingConfig {
            file: log.path().to_path_buf(),
            ..Default::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
