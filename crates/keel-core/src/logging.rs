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

//! A fan-out logger built on the `log` facade types.
//!
//! The [`CompositeLogger`] is created once during assembly and handed to every
//! consumer through the capability registry. It forwards each record to zero or
//! more [`LogSink`]s. Use the [`emit!`](crate::emit) macro to log through a
//! handle.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

/// A destination for log records.
pub trait LogSink: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &str;

    /// Writes one record.
    fn write(&self, record: &Record<'_>);

    /// Flushes buffered output.
    fn flush(&self) {}
}

/// A logger that forwards records to every attached sink.
pub struct CompositeLogger {
    sinks: Vec<Box<dyn LogSink>>,
    level: LevelFilter,
}

impl CompositeLogger {
    /// Creates a logger with no sinks.
    #[must_use]
    pub fn new(level: LevelFilter) -> Self {
        Self {
            sinks: Vec::new(),
            level,
        }
    }

    /// Attaches a sink.
    pub fn add_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sinks.push(sink);
    }

    /// Attaches a sink, builder style.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Returns the names of the attached sinks.
    pub fn sink_names(&self) -> impl Iterator<Item = &str> {
        self.sinks.iter().map(|sink| sink.name())
    }

    /// Returns the number of attached sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Returns the maximum level forwarded to sinks.
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Logs preformatted arguments at `level` under `target`.
    pub fn emit(&self, level: Level, target: &str, args: fmt::Arguments<'_>) {
        self.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(target)
                .build(),
        );
    }

    /// Installs a handle to this logger as the `log` facade's global logger.
    ///
    /// The engine never calls this itself. Binaries opt in so that crates using
    /// the plain `log` macros reach the same sinks.
    pub fn install_as_global(self: &Arc<Self>) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(GlobalHandle(Arc::clone(self))))?;
        log::set_max_level(self.level);
        Ok(())
    }
}

impl Log for CompositeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        !self.sinks.is_empty() && metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        for sink in &self.sinks {
            sink.write(record);
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

impl fmt::Debug for CompositeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeLogger")
            .field("sinks", &self.sink_names().collect::<Vec<_>>())
            .field("level", &self.level)
            .finish()
    }
}

struct GlobalHandle(Arc<CompositeLogger>);

impl Log for GlobalHandle {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.0.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        self.0.log(record);
    }

    fn flush(&self) {
        self.0.flush();
    }
}

/// Logs through a [`CompositeLogger`] handle with `log`-style formatting.
///
/// ```rust
/// use keel_core::emit;
/// use keel_core::logging::CompositeLogger;
///
/// let logger = CompositeLogger::new(log::LevelFilter::Info);
/// emit!(logger, Warn, "no sinks attached, count = {}", logger.sink_count());
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $level:ident, $($arg:tt)+) => {
        $logger.emit(
            $crate::__log::Level::$level,
            module_path!(),
            format_args!($($arg)+),
        )
    };
}
