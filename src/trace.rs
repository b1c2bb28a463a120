//! Wire traffic tracing.
//!
//! When a trace path is configured, every command written to and every
//! response read from an instrument is appended to a JSONL file with a UTC
//! timestamp. Transient flush failures are tolerated up to a bound so a
//! full disk does not abort a running measurement.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

use crate::error::ScpiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Tx,
    Rx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub text: String,
}

#[derive(Debug)]
pub struct TraceLog {
    buffer: Vec<TraceEntry>,
    buffer_size: usize,
    file_path: PathBuf,
    flush_failures: usize,
    max_flush_failures: usize,
}

impl TraceLog {
    pub fn new(file_path: impl Into<PathBuf>, buffer_size: usize) -> Self {
        let mut path = file_path.into();
        if path.extension() != Some(std::ffi::OsStr::new("jsonl")) {
            path.set_extension("jsonl");
        }

        Self {
            buffer: Vec::with_capacity(buffer_size),
            buffer_size,
            file_path: path,
            flush_failures: 0,
            max_flush_failures: 10,
        }
    }

    pub fn record(&mut self, direction: Direction, text: &str) -> Result<(), ScpiError> {
        self.buffer.push(TraceEntry {
            timestamp: Utc::now(),
            direction,
            text: text.to_string(),
        });

        if self.buffer.len() >= self.buffer_size {
            self.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ScpiError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let write_result = (|| {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
                .map_err(|source| ScpiError::Io {
                    source,
                    context: format!("Failed to open trace file {:?}", self.file_path),
                })?;
            let mut writer = std::io::BufWriter::new(file);
            for entry in &self.buffer {
                let json_line =
                    serde_json::to_string(entry).map_err(|e| ScpiError::Response(e.to_string()))?;
                writeln!(writer, "{json_line}").map_err(|source| ScpiError::Io {
                    source,
                    context: format!("Failed to write trace file {:?}", self.file_path),
                })?;
            }
            writer.flush().map_err(|source| ScpiError::Io {
                source,
                context: format!("Failed to flush trace file {:?}", self.file_path),
            })
        })();

        match write_result {
            Ok(()) => {
                self.flush_failures = 0;
                self.buffer.clear();
                Ok(())
            }
            Err(e) => {
                self.flush_failures += 1;
                log::error!(
                    "Trace flush failure {}/{}: {}",
                    self.flush_failures,
                    self.max_flush_failures,
                    e
                );
                if self.flush_failures >= self.max_flush_failures {
                    return Err(e);
                }
                // Transient failure; keep the buffer and retry next time.
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }
}

impl Drop for TraceLog {
    fn drop(&mut self) {
        if self.flush().is_err() {
            info!("Trace log dropped with {} unflushed entries", self.buffer.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_buffer_until_threshold() {
        let dir = std::env::temp_dir().join("benchlink-trace-test-buffer");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut trace = TraceLog::new(dir.join("trace"), 100);
        trace.record(Direction::Tx, "*IDN?").unwrap();
        trace.record(Direction::Rx, "AGILENT,33522A").unwrap();
        assert_eq!(trace.len(), 2);
        trace.flush().unwrap();
        assert!(trace.is_empty());

        let content = std::fs::read_to_string(trace.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: TraceEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.direction, Direction::Tx);
        assert_eq!(first.text, "*IDN?");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn jsonl_extension_enforced() {
        let trace = TraceLog::new("/tmp/benchlink-wire.log", 10);
        assert_eq!(trace.path().extension().unwrap(), "jsonl");
    }
}
