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

//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or reading the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The external configuration file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid TOML.
    #[error("failed to parse config document {origin}: {source}")]
    Parse {
        /// Where the document came from (a path or `<embedded>`).
        origin: String,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },

    /// A value exists but cannot be converted to the requested type.
    #[error("invalid value '{value}' for config key '{key}': {message}")]
    InvalidValue {
        /// The dotted key.
        key: String,
        /// The raw string value.
        value: String,
        /// Why the conversion failed.
        message: String,
    },

    /// A section cannot be deserialized into the requested struct.
    #[error("failed to deserialize config section '{prefix}': {source}")]
    Section {
        /// The dotted section prefix.
        prefix: String,
        /// The deserializer error.
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::invalid_value("runtime.ticks_per_second", "fast", "not an integer");
        let text = err.to_string();
        assert!(text.contains("runtime.ticks_per_second"));
        assert!(text.contains("fast"));
        assert!(text.contains("not an integer"));
    }
}
