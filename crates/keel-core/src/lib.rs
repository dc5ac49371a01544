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

//! # Keel Core
//!
//! Foundational crate containing the capability contracts, the configuration
//! store, the composed logger, and the capability registry that the engine is
//! assembled from.

#![warn(missing_docs)]

pub mod capability;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use capability::*;
pub use config::{ConfigError, ConfigSource, ConfigStore};
pub use error::BackendError;
pub use logging::{CompositeLogger, LogSink};
pub use registry::{BindingKind, CapabilityRegistry, FromRegistry, Registration, RegistryError};

#[doc(hidden)]
pub use log as __log;
