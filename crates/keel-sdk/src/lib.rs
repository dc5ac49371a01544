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

//! The public-facing entry point of the Keel engine.
//!
//! This crate assembles a session from the contracts in `keel-core` and the
//! implementations in `keel-infra`: it loads the configuration, registers a
//! default binding for every capability, composes the session logger, reports
//! fallbacks, wires the subsystems, and drives the frame loop.
//!
//! ```rust,no_run
//! use keel_sdk::Engine;
//!
//! let summary = Engine::builder().suppress_bootstrap_warnings(true).run()?;
//! println!("ran {} ticks", summary.ticks);
//! # Ok::<(), keel_sdk::BootstrapError>(())
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod fallback;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod wiring;

pub use engine::{AssembledEngine, Engine, EngineBuilder, SessionSummary};
pub use error::BootstrapError;
pub use fallback::{FallbackNotice, FallbackPolicy};
pub use game::{DefaultGame, FrameSteps};
pub use logging::{LoggingComposer, LoggingReport};
pub use runtime::{DefaultRuntime, RuntimeSettings};
pub use wiring::{wire, Wiring};

pub use keel_core;
pub use keel_infra;

/// Common imports for applications built on the engine.
pub mod prelude {
    pub use crate::{DefaultGame, Engine, FrameSteps};
    pub use keel_core::{
        emit, CapabilityRegistry, CompositeLogger, DepthTestingMode, EntityManager,
        FromRegistry, Game, GraphicsApiSettings, InputMapper, Message, MessageHandler,
        PlatformSettings, RegistryError, Runtime,
    };
}
