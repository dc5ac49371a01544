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

//! Builds the session logger from configuration.

use keel_core::{ConfigStore, CompositeLogger, LogSink};
use keel_infra::{ConsoleSink, FileSink};
use log::LevelFilter;

/// A sink the composer could not attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSink {
    /// The sink that was skipped.
    pub sink: &'static str,
    /// Why it was skipped.
    pub reason: String,
}

/// What [`LoggingComposer::compose`] attached.
#[derive(Debug, Clone, Default)]
pub struct LoggingReport {
    /// Names of the attached sinks, in order.
    pub sinks: Vec<String>,
    /// Sinks that were requested or probed but not attached.
    pub skipped: Vec<SkippedSink>,
    /// Configuration values that were malformed and replaced by defaults.
    pub warnings: Vec<String>,
}

/// Composes a [`CompositeLogger`] from the `[logging]` section.
///
/// * `logging.level` sets the filter (`info` when absent or malformed).
/// * A console sink is added when the process has a console and
///   `logging.console` is not `false`.
/// * `logging.file` adds a file sink; failing to open it only drops that sink.
/// * Caller-supplied sinks are appended last.
#[derive(Default)]
pub struct LoggingComposer {
    extra: Vec<Box<dyn LogSink>>,
}

impl LoggingComposer {
    /// Creates a composer with no extra sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a caller-supplied sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.extra.push(sink);
        self
    }

    /// Appends several caller-supplied sinks.
    #[must_use]
    pub fn with_sinks(mut self, sinks: impl IntoIterator<Item = Box<dyn LogSink>>) -> Self {
        self.extra.extend(sinks);
        self
    }

    /// Builds the logger. Never fails.
    pub fn compose(self, config: &ConfigStore) -> (CompositeLogger, LoggingReport) {
        let mut report = LoggingReport::default();

        let level = config
            .parse_or("logging.level", LevelFilter::Info)
            .unwrap_or_else(|e| {
                report.warnings.push(e.to_string());
                LevelFilter::Info
            });
        let console_enabled = config.parse_or("logging.console", true).unwrap_or_else(|e| {
            report.warnings.push(e.to_string());
            true
        });

        let mut logger = CompositeLogger::new(level);

        if !console_enabled {
            report.skipped.push(SkippedSink {
                sink: "console",
                reason: "disabled by logging.console".to_string(),
            });
        } else if let Some(console) = ConsoleSink::try_new(level) {
            logger.add_sink(Box::new(console));
        } else {
            report.skipped.push(SkippedSink {
                sink: "console",
                reason: "no console attached".to_string(),
            });
        }

        if let Some(path) = config.get("logging.file").filter(|p| !p.is_empty()) {
            match FileSink::open(path) {
                Ok(file) => logger.add_sink(Box::new(file)),
                Err(e) => report.skipped.push(SkippedSink {
                    sink: "file",
                    reason: format!("cannot open '{path}': {e}"),
                }),
            }
        }

        for sink in self.extra {
            logger.add_sink(sink);
        }

        report.sinks = logger.sink_names().map(str::to_string).collect();
        (logger, report)
    }
}
