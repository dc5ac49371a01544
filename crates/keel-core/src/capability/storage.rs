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

//! The persistent storage contract.

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot store.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    /// The backend failed to read or write.
    #[error("storage i/o failed for key '{key}': {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A stored value could not be encoded or decoded.
    #[error("failed to (de)serialize value for key '{key}': {message}")]
    Serialization {
        /// The key being accessed.
        key: String,
        /// Details from the serializer.
        message: String,
    },
}

/// A key/value byte store used for save data and settings.
pub trait StorageSystem: Send + Sync {
    /// Reads the value for `key`, or `None` if it does not exist.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Writes `bytes` under `key`, replacing any previous value.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Removes `key`. Returns `false` if it did not exist.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Returns `true` if `key` exists.
    fn exists(&self, key: &str) -> Result<bool, StorageError>;
}
