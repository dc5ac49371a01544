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

//! A headless `wgpu` device as the graphics backend.
//!
//! The backend owns a device and queue without a surface. Shader modules are
//! compiled through `wgpu` against the active depth mode; changing the mode
//! afterwards invalidates every compiled module, which then has to be rebuilt.

use keel_core::{
    emit, BackendError, CapabilityRegistry, CompositeLogger, DepthTestingMode, FromRegistry,
    GraphicsApi, RegistryError, ShaderId, ShaderSource,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FrameState {
    encoder: Option<wgpu::CommandEncoder>,
    draws: u32,
}

/// A real graphics backend built on `wgpu`.
#[derive(Debug)]
pub struct WgpuGraphicsApi {
    logger: Arc<CompositeLogger>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_name: String,
    depth_mode: Mutex<DepthTestingMode>,
    shaders: Mutex<HashMap<ShaderId, wgpu::ShaderModule>>,
    next_shader: AtomicU64,
    frame: Mutex<FrameState>,
}

impl WgpuGraphicsApi {
    /// Requests an adapter and device, blocking until both are available.
    pub fn new(logger: Arc<CompositeLogger>) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .map_err(|e| BackendError::initialization("wgpu", e))?;

        let adapter_name = adapter.get_info().name;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Keel Logical Device"),
            ..Default::default()
        }))
        .map_err(|e| BackendError::initialization("wgpu", e))?;

        emit!(logger, Info, "wgpu device ready on adapter '{}'", adapter_name);

        Ok(Self {
            logger,
            device,
            queue,
            adapter_name,
            depth_mode: Mutex::new(DepthTestingMode::default()),
            shaders: Mutex::new(HashMap::new()),
            next_shader: AtomicU64::new(0),
            frame: Mutex::new(FrameState::default()),
        })
    }

    /// Returns the name of the selected adapter.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn frame(&self) -> MutexGuard<'_, FrameState> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GraphicsApi for WgpuGraphicsApi {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn set_depth_testing_mode(&self, mode: DepthTestingMode) {
        let mut current = self.depth_mode.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == mode {
            return;
        }
        *current = mode;

        let mut shaders = self.shaders.lock().unwrap_or_else(PoisonError::into_inner);
        if !shaders.is_empty() {
            emit!(
                self.logger,
                Warn,
                "Depth testing mode changed to '{}' after {} shader(s) were compiled; they are invalidated",
                mode,
                shaders.len()
            );
            shaders.clear();
        }
    }

    fn depth_testing_mode(&self) -> DepthTestingMode {
        *self.depth_mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn compile_shader(&self, source: &ShaderSource) -> Result<ShaderId, BackendError> {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.label.as_ref()),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.clone()),
            });

        let id = ShaderId(self.next_shader.fetch_add(1, Ordering::Relaxed));
        self.shaders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, module);
        emit!(
            self.logger,
            Debug,
            "Compiled shader '{}' as {:?} (depth: {})",
            source.label,
            id,
            self.depth_testing_mode()
        );
        Ok(id)
    }

    fn is_shader_compiled(&self, shader: ShaderId) -> bool {
        self.shaders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&shader)
    }

    fn begin_frame(&self) -> Result<(), BackendError> {
        let mut frame = self.frame();
        if frame.encoder.is_some() {
            return Err(BackendError::Frame("frame already in progress".to_string()));
        }
        frame.encoder = Some(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Keel Frame Encoder"),
                }),
        );
        frame.draws = 0;
        Ok(())
    }

    fn draw(&self, shader: ShaderId, _instance_count: u32) -> Result<(), BackendError> {
        if !self
            .shaders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&shader)
        {
            return Err(BackendError::InvalidState(format!(
                "shader {shader:?} is not compiled"
            )));
        }
        let mut frame = self.frame();
        if frame.encoder.is_none() {
            return Err(BackendError::Frame("draw outside of a frame".to_string()));
        }
        frame.draws += 1;
        Ok(())
    }

    fn end_frame(&self) -> Result<(), BackendError> {
        let mut frame = self.frame();
        let encoder = frame
            .encoder
            .take()
            .ok_or_else(|| BackendError::Frame("no frame in progress".to_string()))?;
        self.queue.submit(std::iter::once(encoder.finish()));
        emit!(self.logger, Trace, "Submitted frame with {} draw(s)", frame.draws);
        Ok(())
    }
}

impl FromRegistry for WgpuGraphicsApi {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Self::new(registry.resolve::<CompositeLogger>()?)
            .map_err(RegistryError::construction::<Self>)
    }
}
