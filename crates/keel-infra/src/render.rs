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

//! A forward render system that issues one instanced draw per frame.

use keel_core::{
    emit, BackendError, CapabilityRegistry, CompositeLogger, EntityId, EntityProcessor, FromRegistry,
    GraphicsApi, RegistryError, RenderSystem, ShaderId, ShaderSource,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The WGSL source of the unlit shader compiled at construction.
pub const UNLIT_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let x = f32(i32(index) - 1);
    let y = f32(i32(index & 1u) * 2 - 1);
    var out: VertexOutput;
    out.clip_position = vec4<f32>(x, y, 0.0, 1.0);
    return out;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

/// The reference [`RenderSystem`].
///
/// Shaders are compiled when the system is constructed, so the graphics depth
/// mode must already be set by then. If a later mode change invalidates the
/// shader, it is recompiled before the next draw.
pub struct BasicRenderSystem {
    graphics: Arc<dyn GraphicsApi>,
    logger: Arc<CompositeLogger>,
    shader: Mutex<ShaderId>,
    frames: AtomicU64,
}

fn unlit_source() -> ShaderSource {
    ShaderSource {
        label: "Unlit Shader".into(),
        wgsl: UNLIT_WGSL.into(),
    }
}

impl BasicRenderSystem {
    /// Compiles the unlit shader and creates the render system.
    pub fn new(
        graphics: Arc<dyn GraphicsApi>,
        logger: Arc<CompositeLogger>,
    ) -> Result<Self, RegistryError> {
        let shader = graphics
            .compile_shader(&unlit_source())
            .map_err(RegistryError::construction::<Self>)?;
        emit!(
            logger,
            Info,
            "Render system ready on '{}' (depth: {})",
            graphics.name(),
            graphics.depth_testing_mode()
        );
        Ok(Self {
            graphics,
            logger,
            shader: Mutex::new(shader),
            frames: AtomicU64::new(0),
        })
    }

    fn current_shader(&self) -> Result<ShaderId, BackendError> {
        let mut shader = self.shader.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.graphics.is_shader_compiled(*shader) {
            *shader = self.graphics.compile_shader(&unlit_source())?;
            emit!(
                self.logger,
                Info,
                "Recompiled the unlit shader for depth mode '{}'",
                self.graphics.depth_testing_mode()
            );
        }
        Ok(*shader)
    }

    fn render_frame(&self, entities: &[EntityId]) -> Result<(), BackendError> {
        let shader = self.current_shader()?;
        self.graphics.begin_frame()?;
        if !entities.is_empty() {
            let instances = u32::try_from(entities.len()).unwrap_or(u32::MAX);
            self.graphics.draw(shader, instances)?;
        }
        self.graphics.end_frame()
    }
}

impl EntityProcessor for BasicRenderSystem {
    fn name(&self) -> &str {
        "basic-render-system"
    }

    fn draw(&self, entities: &[EntityId]) {
        match self.render_frame(entities) {
            Ok(()) => {
                let frame = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
                emit!(self.logger, Trace, "Frame {} rendered.", frame);
            }
            Err(e) => emit!(self.logger, Error, "Rendering error: {}", e),
        }
    }
}

impl RenderSystem for BasicRenderSystem {
    fn frames_rendered(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    fn into_entity_processor(self: Arc<Self>) -> Arc<dyn EntityProcessor> {
        self
    }
}

impl FromRegistry for BasicRenderSystem {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Self::new(
            registry.resolve::<dyn GraphicsApi>()?,
            registry.resolve::<CompositeLogger>()?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::NullGraphicsApi;
    use keel_core::DepthTestingMode;
    use log::LevelFilter;

    #[test]
    fn draws_once_per_frame_when_entities_exist() {
        let graphics = Arc::new(NullGraphicsApi::new());
        let logger = Arc::new(CompositeLogger::new(LevelFilter::Off));
        let system = BasicRenderSystem::new(graphics.clone(), logger).unwrap();

        system.draw(&[]);
        system.draw(&[1, 2, 3]);

        assert_eq!(system.frames_rendered(), 2);
        assert_eq!(graphics.frames(), 2);
        assert_eq!(graphics.draws(), 1);
    }

    #[test]
    fn late_depth_change_recompiles_before_the_next_frame() {
        let graphics = Arc::new(NullGraphicsApi::new());
        let logger = Arc::new(CompositeLogger::new(LevelFilter::Off));
        let system = BasicRenderSystem::new(graphics.clone(), logger).unwrap();
        system.draw(&[1]);
        assert_eq!(graphics.shaders_compiled(), 1);

        graphics.set_depth_testing_mode(DepthTestingMode::Greater);
        system.draw(&[1]);
        system.draw(&[1]);

        assert_eq!(graphics.shaders_compiled(), 2);
        assert_eq!(system.frames_rendered(), 3);
        assert_eq!(graphics.draws(), 3);
    }
}
