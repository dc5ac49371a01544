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

#![allow(dead_code)]

use keel_core::{
    emit, BackendError, CapabilityRegistry, CompositeLogger, DepthTestingMode, FromRegistry,
    Game, GraphicsApi, RegistryError, Runtime, ShaderId, ShaderSource,
};
use keel_sdk::FrameSteps;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Writes a session config with console output disabled and pacing off.
pub fn write_config(dir: &TempDir, max_ticks: u64, extra: &str) -> PathBuf {
    let path = dir.path().join("keel.toml");
    let body = format!(
        "[logging]\nlevel = \"trace\"\nconsole = false\n\n\
         [runtime]\nticks_per_second = 1000\nmax_ticks = {max_ticks}\nframe_pacing = false\n\n\
         {extra}\n"
    );
    std::fs::write(&path, body).expect("write config");
    path
}

/// An ordered record of calls shared between a test and its doubles.
#[derive(Default)]
pub struct Journal(Mutex<Vec<String>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

/// A graphics backend that journals every call.
pub struct RecordingGraphics {
    journal: Arc<Journal>,
    depth: Mutex<DepthTestingMode>,
}

impl RecordingGraphics {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self {
            journal,
            depth: Mutex::new(DepthTestingMode::default()),
        }
    }
}

impl GraphicsApi for RecordingGraphics {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn set_depth_testing_mode(&self, mode: DepthTestingMode) {
        self.journal.push(format!("set_depth_testing_mode({mode})"));
        *self.depth.lock().unwrap() = mode;
    }

    fn depth_testing_mode(&self) -> DepthTestingMode {
        *self.depth.lock().unwrap()
    }

    fn compile_shader(&self, source: &ShaderSource) -> Result<ShaderId, BackendError> {
        self.journal.push(format!("compile_shader({})", source.label));
        Ok(ShaderId(1))
    }

    fn begin_frame(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw(&self, _shader: ShaderId, _instance_count: u32) -> Result<(), BackendError> {
        Ok(())
    }

    fn end_frame(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// A game that journals its lifecycle and stops the runtime on its first update.
pub struct StopOnFirstUpdate {
    steps: FrameSteps,
    runtime: Arc<dyn Runtime>,
    journal: Arc<Journal>,
    logger: Arc<CompositeLogger>,
}

impl Game for StopOnFirstUpdate {
    fn initialize(&mut self) {
        self.journal.push("initialize");
    }

    fn update(&mut self) {
        self.steps.update();
        self.journal.push("update");
        emit!(self.logger, Info, "requesting termination from update");
        self.runtime.terminate();
    }

    fn render(&mut self, alpha: f64) {
        self.steps.render(alpha);
        self.journal.push("render");
    }

    fn terminate(&mut self) {
        self.journal.push("terminate");
    }
}

impl FromRegistry for StopOnFirstUpdate {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            steps: registry.construct::<FrameSteps>()?,
            runtime: registry.resolve::<dyn Runtime>()?,
            journal: registry.resolve::<Journal>()?,
            logger: registry.resolve::<CompositeLogger>()?,
        })
    }
}
