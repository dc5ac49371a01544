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

//! Capability contracts.
//!
//! Each trait here is an abstract role that one concrete implementation fills
//! per assembly session. Implementations live in `keel-infra` (backends and
//! reference collaborators) and `keel-sdk` (runtime and reference game), or in
//! the consuming game itself.

pub mod entity;
pub mod game;
pub mod graphics;
pub mod input;
pub mod message;
pub mod platform;
pub mod render;
pub mod runtime;
pub mod service;
pub mod storage;

pub use entity::{EntityId, EntityManager, EntityProcessor};
pub use game::{Game, SharedGame};
pub use graphics::{DepthTestingMode, GraphicsApi, GraphicsApiSettings, ShaderId, ShaderSource};
pub use input::{InputEvent, InputMapper, MouseButton};
pub use message::{Message, MessageHandler};
pub use platform::{Platform, PlatformEvent, PlatformSettings};
pub use render::RenderSystem;
pub use runtime::{LifecycleState, Runtime, RuntimeError};
pub use service::{GenerationRequest, GenerativeService, ServiceError};
pub use storage::{StorageError, StorageSystem};
