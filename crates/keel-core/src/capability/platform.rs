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

//! The platform contract: windowing and OS event delivery.

use super::input::InputEvent;
use crate::error::BackendError;

/// Caller-supplied settings for opening the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    /// The window (or process) title.
    pub title: String,
    /// Requested inner width in physical pixels.
    pub width: u32,
    /// Requested inner height in physical pixels.
    pub height: u32,
    /// Whether presentation should wait for vertical sync.
    pub vsync: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            title: "Keel".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// A non-input event produced by the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The user or OS asked the application to close.
    CloseRequested,
    /// The drawable area changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// The application gained (`true`) or lost (`false`) focus.
    FocusChanged(bool),
}

/// Abstracts the host platform (window, event pump, raw input).
///
/// Any backend (a windowing library, a headless driver, ...) can implement this
/// trait. A no-op variant exists for builds without a real backend.
pub trait Platform: Send + Sync {
    /// A short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Opens the window or equivalent resources.
    fn open(&self, settings: &PlatformSettings) -> Result<(), BackendError>;

    /// Pumps the OS event queue and returns the window-level events since the last call.
    fn poll_events(&self) -> Vec<PlatformEvent>;

    /// Returns the raw input events buffered since the last call.
    fn drain_input(&self) -> Vec<InputEvent>;

    /// Releases the platform resources. Safe to call more than once.
    fn close(&self);
}
