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

//! Engine configuration store.
//!
//! Exactly one source is active per session:
//!
//! 1. the external file at the conventional path, if that file exists;
//! 2. otherwise the default document embedded in the binary.
//!
//! The two are never merged. Sections are TOML tables and are flattened into
//! dotted keys (`[runtime] ticks_per_second = 60` becomes
//! `runtime.ticks_per_second = "60"`).

mod error;

pub use error::ConfigError;

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The conventional location of the external configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "keel.toml";

/// Environment variable that redirects the conventional configuration path.
pub const CONFIG_PATH_ENV: &str = "KEEL_CONFIG";

const EMBEDDED_DEFAULT: &str = include_str!("default_config.toml");

/// Returns the path checked for an external configuration file.
///
/// This is [`DEFAULT_CONFIG_PATH`] unless [`CONFIG_PATH_ENV`] is set.
pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// An external file that existed at load time.
    External(PathBuf),
    /// The document compiled into the binary.
    Embedded,
    /// A document supplied in memory by the caller.
    Inline,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::External(path) => write!(f, "'{}'", path.display()),
            ConfigSource::Embedded => write!(f, "<embedded>"),
            ConfigSource::Inline => write!(f, "<inline>"),
        }
    }
}

/// An immutable mapping from dotted keys to string values.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    values: BTreeMap<String, String>,
    document: toml::Table,
    source: ConfigSource,
}

impl ConfigStore {
    /// Loads the configuration from `path` if it exists, else from the embedded default.
    ///
    /// # Errors
    ///
    /// Fails if the selected source cannot be read or parsed. An external file
    /// that exists but is broken is fatal; it never falls back to the default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            let text =
                std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
            Self::parse_document(&text, ConfigSource::External(path.to_path_buf()))
        } else {
            Self::embedded()
        }
    }

    /// Loads from [`default_config_path`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }

    /// Parses the embedded default document.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse_document(EMBEDDED_DEFAULT, ConfigSource::Embedded)
    }

    /// Parses an in-memory document.
    pub fn parse_inline(text: &str) -> Result<Self, ConfigError> {
        Self::parse_document(text, ConfigSource::Inline)
    }

    fn parse_document(text: &str, source: ConfigSource) -> Result<Self, ConfigError> {
        let document: toml::Table =
            toml::from_str(text).map_err(|e| ConfigError::parse(source.to_string(), e))?;

        let mut values = BTreeMap::new();
        flatten_into(&mut values, "", &document);

        Ok(Self {
            values,
            document,
            source,
        })
    }

    /// Returns the source this store was loaded from.
    #[must_use]
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Returns the raw string value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the raw value for `key`, or `default` if absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parses the value for `key` into `T`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| ConfigError::invalid_value(key, raw, e))
            })
            .transpose()
    }

    /// Parses the value for `key` into `T`, or returns `default` if absent.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.parse(key)?.unwrap_or(default))
    }

    /// Iterates over the entries below `prefix`, yielding keys relative to it.
    pub fn section<'a>(&'a self, prefix: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let lead = format!("{prefix}.");
        self.values.iter().filter_map(move |(key, value)| {
            key.strip_prefix(lead.as_str())
                .map(|rest| (rest, value.as_str()))
        })
    }

    /// Deserializes the table at the dotted `prefix` into `T`.
    ///
    /// Returns `Ok(None)` if there is no such table.
    pub fn section_as<T: DeserializeOwned>(&self, prefix: &str) -> Result<Option<T>, ConfigError> {
        let mut current = &self.document;
        for part in prefix.split('.') {
            match current.get(part) {
                Some(toml::Value::Table(table)) => current = table,
                _ => return Ok(None),
            }
        }
        toml::Value::Table(current.clone())
            .try_into::<T>()
            .map(Some)
            .map_err(|source| ConfigError::Section {
                prefix: prefix.to_string(),
                source,
            })
    }

    /// Iterates over all keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten_into(values: &mut BTreeMap<String, String>, prefix: &str, table: &toml::Table) {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        match value {
            toml::Value::Table(nested) => flatten_into(values, &key, nested),
            toml::Value::String(text) => {
                values.insert(key, text.clone());
            }
            other => {
                values.insert(key, other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[test]
    fn embedded_default_parses() {
        let store = ConfigStore::embedded().unwrap();
        assert_eq!(store.source(), &ConfigSource::Embedded);
        assert_eq!(store.get("runtime.ticks_per_second"), Some("60"));
        assert_eq!(store.get("logging.level"), Some("info"));
        assert_eq!(store.get("input.bindings.confirm"), Some("Enter"));
    }

    #[test]
    fn external_file_wins_when_present() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runtime]\nticks_per_second = 30").unwrap();

        let store = ConfigStore::load(file.path()).unwrap();
        assert_eq!(
            store.source(),
            &ConfigSource::External(file.path().to_path_buf())
        );
        assert_eq!(store.get("runtime.ticks_per_second"), Some("30"));
        // No merge with the embedded default.
        assert_eq!(store.get("logging.level"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_uses_embedded_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(store.source(), &ConfigSource::Embedded);
        assert_eq!(store.get("platform.title"), Some("Keel"));
    }

    #[test]
    fn broken_external_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runtime\nticks_per_second = ").unwrap();

        let err = ConfigStore::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn typed_access() {
        let store = ConfigStore::parse_inline(
            "[runtime]\nticks_per_second = 120\nframe_pacing = false\nname = \"fast\"",
        )
        .unwrap();

        assert_eq!(
            store.parse::<u32>("runtime.ticks_per_second").unwrap(),
            Some(120)
        );
        assert!(!store.parse_or("runtime.frame_pacing", true).unwrap());
        assert_eq!(store.parse_or("runtime.max_ticks", 7u64).unwrap(), 7);
        assert!(matches!(
            store.parse::<u32>("runtime.name"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(store.get_or("runtime.missing", "fallback"), "fallback");
    }

    #[test]
    fn section_iteration_and_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Runtime {
            ticks_per_second: u32,
            frame_pacing: bool,
        }

        let store = ConfigStore::parse_inline(
            "[runtime]\nticks_per_second = 50\nframe_pacing = true\n[other]\nx = 1",
        )
        .unwrap();

        let keys: Vec<_> = store.section("runtime").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["frame_pacing", "ticks_per_second"]);

        let runtime: Runtime = store.section_as("runtime").unwrap().unwrap();
        assert_eq!(
            runtime,
            Runtime {
                ticks_per_second: 50,
                frame_pacing: true
            }
        );
        assert!(store.section_as::<Runtime>("absent").unwrap().is_none());
    }

    #[test]
    fn inline_document_and_key_parsing_coexist() {
        let store = ConfigStore::parse_inline("[platform]\nframe_budget = 3").unwrap();
        assert_eq!(store.source(), &ConfigSource::Inline);
        assert_eq!(store.parse::<u64>("platform.frame_budget").unwrap(), Some(3));
        assert_eq!(store.parse_or("platform.frame_budget", 0u64).unwrap(), 3);
        assert_eq!(store.parse::<u64>("platform.absent").unwrap(), None);
    }
}
