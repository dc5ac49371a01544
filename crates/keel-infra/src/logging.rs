// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Concrete log sinks for the composed logger.

use keel_core::LogSink;
use log::{Level, LevelFilter, Log, Record};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Setting this environment variable to `1` marks the console as available even
/// when stderr is not a terminal.
pub const FORCE_CONSOLE_ENV: &str = "KEEL_FORCE_CONSOLE";

/// Writes records to stderr through `env_logger`.
///
/// `RUST_LOG` still refines the filter, with `level` as the default.
pub struct ConsoleSink {
    inner: env_logger::Logger,
}

impl ConsoleSink {
    /// Returns `true` if a console is attached to stderr.
    pub fn is_available() -> bool {
        std::env::var_os(FORCE_CONSOLE_ENV).is_some_and(|value| value == "1")
            || std::io::stderr().is_terminal()
    }

    /// Creates a console sink regardless of availability.
    pub fn new(level: LevelFilter) -> Self {
        use env_logger::{Builder, Env};

        let inner = Builder::from_env(Env::default().default_filter_or(level.to_string()))
            .filter_module("wgpu_hal", LevelFilter::Error)
            .build();
        Self { inner }
    }

    /// Creates a console sink only if a console is available.
    pub fn try_new(level: LevelFilter) -> Option<Self> {
        Self::is_available().then(|| Self::new(level))
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, record: &Record<'_>) {
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Appends records to a log file.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Opens (or creates) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Returns the path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&self, record: &Record<'_>) {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(
            writer,
            "{seconds:.3} {:<5} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush();
    }
}

/// A record captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// The record level.
    pub level: Level,
    /// The record target.
    pub target: String,
    /// The formatted message.
    pub message: String,
}

/// A shared, inspectable buffer of captured log records.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl MemoryLog {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a sink that writes into this buffer.
    pub fn sink(&self) -> MemorySink {
        MemorySink {
            records: Arc::clone(&self.records),
        }
    }

    /// Returns a copy of every captured record.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of captured records at exactly `level`.
    pub fn count_at(&self, level: Level) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    /// Returns `true` if any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|record| record.message.contains(needle))
    }
}

/// A sink that stores records in a [`MemoryLog`].
#[derive(Debug)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, record: &Record<'_>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedRecord {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{emit, CompositeLogger};

    #[test]
    fn memory_log_captures_through_composite() {
        let log = MemoryLog::new();
        let logger = CompositeLogger::new(LevelFilter::Debug).with_sink(Box::new(log.sink()));

        emit!(logger, Warn, "backend {} missing", "platform");
        emit!(logger, Debug, "detail");

        assert_eq!(log.count_at(Level::Warn), 1);
        assert_eq!(log.count_at(Level::Debug), 1);
        assert!(log.contains("backend platform missing"));
    }

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("engine.log");

        let sink = FileSink::open(&path).unwrap();
        let logger = CompositeLogger::new(LevelFilter::Info).with_sink(Box::new(sink));
        emit!(logger, Info, "first");
        emit!(logger, Error, "second");
        log::Log::flush(&logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO") && lines[0].ends_with("first"));
        assert!(lines[1].contains("ERROR") && lines[1].ends_with("second"));
    }
}
