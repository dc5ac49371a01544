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

//! # Keel Infra
//!
//! Concrete implementations of the capability contracts defined in
//! `keel-core`: platform and graphics backends with their no-op fallbacks,
//! logging sinks, storage, and small reference collaborators (entities,
//! messages, input, rendering).
//!
//! Real backends are selected statically through cargo features:
//!
//! | Feature    | `DefaultPlatform`  | `DefaultGraphicsApi` |
//! |------------|--------------------|----------------------|
//! | (none)     | [`NullPlatform`]   | [`NullGraphicsApi`]  |
//! | `headless` | `HeadlessPlatform` |                      |
//! | `wgpu`     |                    | `WgpuGraphicsApi`    |

#![warn(missing_docs)]

pub mod entity;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod message;
pub mod platform;
pub mod render;
pub mod service;
pub mod storage;

pub use entity::SimpleEntityManager;
pub use graphics::{DefaultGraphicsApi, NullGraphicsApi};
pub use input::ActionInputMapper;
pub use logging::{ConsoleSink, FileSink, MemoryLog, MemorySink};
pub use message::QueuedMessageHandler;
pub use platform::{DefaultPlatform, NullPlatform};
pub use render::BasicRenderSystem;
pub use service::NullGenerativeService;
pub use storage::{FileStorage, MemoryStorage};

#[cfg(feature = "headless")]
pub use platform::HeadlessPlatform;
#[cfg(feature = "wgpu")]
pub use graphics::WgpuGraphicsApi;
