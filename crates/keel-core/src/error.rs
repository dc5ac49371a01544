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

//! Errors shared by backend implementations.

use thiserror::Error;

/// An error raised by a concrete backend (platform, graphics, ...).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be initialized.
    #[error("backend '{backend}' failed to initialize: {message}")]
    Initialization {
        /// The backend name.
        backend: &'static str,
        /// Details from the backend.
        message: String,
    },
    /// A shader failed to compile.
    #[error("shader '{label}' failed to compile: {message}")]
    Shader {
        /// The shader label.
        label: String,
        /// Compiler output.
        message: String,
    },
    /// A frame could not be started or presented.
    #[error("frame error: {0}")]
    Frame(String),
    /// The operation needs a state the backend is not in.
    #[error("invalid backend state: {0}")]
    InvalidState(String),
}

impl BackendError {
    /// Creates an initialization error.
    pub fn initialization(backend: &'static str, message: impl ToString) -> Self {
        Self::Initialization {
            backend,
            message: message.to_string(),
        }
    }
}
