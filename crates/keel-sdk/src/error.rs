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

//! Errors that abort engine assembly.

use keel_core::{ConfigError, RegistryError, RuntimeError};
use thiserror::Error;

/// An assembly-fatal failure. Degraded capabilities never end up here.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration could not be loaded or a value is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A capability could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The runtime refused to start or its platform failed to open.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
