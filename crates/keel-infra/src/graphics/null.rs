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

//! The inert graphics backend used when no real backend is compiled in.

use keel_core::{
    BackendError, BindingKind, CapabilityRegistry, DepthTestingMode, FromRegistry, GraphicsApi,
    RegistryError, ShaderId, ShaderSource,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// A graphics backend that accepts every call and draws nothing.
///
/// It still tracks state (depth mode, shader handles, frame count) so that the
/// layers above it behave the same as on a real device. Like a real device, a
/// depth mode change invalidates the shaders compiled so far.
#[derive(Debug, Default)]
pub struct NullGraphicsApi {
    depth_mode: Mutex<DepthTestingMode>,
    compiled: Mutex<BTreeSet<ShaderId>>,
    next_shader: AtomicU64,
    frames: AtomicU64,
    draws: AtomicU64,
}

impl NullGraphicsApi {
    /// Creates a null backend with the default depth mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of frames ended so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Returns the number of shaders compiled so far, invalidated ones included.
    pub fn shaders_compiled(&self) -> u64 {
        self.next_shader.load(Ordering::Relaxed)
    }

    /// Returns the number of draw calls recorded so far.
    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }
}

impl GraphicsApi for NullGraphicsApi {
    fn name(&self) -> &'static str {
        "null"
    }

    fn set_depth_testing_mode(&self, mode: DepthTestingMode) {
        let mut current = self.depth_mode.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != mode {
            *current = mode;
            self.compiled
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    fn depth_testing_mode(&self) -> DepthTestingMode {
        *self.depth_mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn compile_shader(&self, _source: &ShaderSource) -> Result<ShaderId, BackendError> {
        let id = ShaderId(self.next_shader.fetch_add(1, Ordering::Relaxed));
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        Ok(id)
    }

    fn is_shader_compiled(&self, shader: ShaderId) -> bool {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&shader)
    }

    fn begin_frame(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw(&self, _shader: ShaderId, _instance_count: u32) -> Result<(), BackendError> {
        self.draws.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn end_frame(&self) -> Result<(), BackendError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl FromRegistry for NullGraphicsApi {
    const KIND: BindingKind = BindingKind::Null;

    fn from_registry(_registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_state_without_a_device() {
        let api = NullGraphicsApi::new();
        api.set_depth_testing_mode(DepthTestingMode::Greater);
        assert_eq!(api.depth_testing_mode(), DepthTestingMode::Greater);

        let source = ShaderSource {
            label: "test".into(),
            wgsl: "".into(),
        };
        let a = api.compile_shader(&source).unwrap();
        let b = api.compile_shader(&source).unwrap();
        assert_ne!(a, b);

        api.begin_frame().unwrap();
        api.draw(a, 4).unwrap();
        api.end_frame().unwrap();
        assert_eq!(api.frames(), 1);
        assert_eq!(api.draws(), 1);
    }

    #[test]
    fn depth_change_invalidates_compiled_shaders() {
        let api = NullGraphicsApi::new();
        let source = ShaderSource {
            label: "test".into(),
            wgsl: "".into(),
        };
        let shader = api.compile_shader(&source).unwrap();
        assert!(api.is_shader_compiled(shader));

        api.set_depth_testing_mode(DepthTestingMode::Less);
        assert!(api.is_shader_compiled(shader));

        api.set_depth_testing_mode(DepthTestingMode::Always);
        assert!(!api.is_shader_compiled(shader));
        assert!(!api.is_shader_compiled(ShaderId(99)));
    }
}
