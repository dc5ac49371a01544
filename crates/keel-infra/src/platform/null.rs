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

//! The inert platform used when no real backend is compiled in.

use keel_core::{
    BackendError, BindingKind, CapabilityRegistry, FromRegistry, InputEvent, Platform,
    PlatformEvent, PlatformSettings, RegistryError,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// A platform that opens nothing and never produces events.
///
/// The engine keeps running on top of it; only a game or the runtime can end
/// the session.
#[derive(Debug, Default)]
pub struct NullPlatform {
    open: AtomicBool,
}

impl NullPlatform {
    /// Creates a closed null platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` between `open` and `close`.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Platform for NullPlatform {
    fn name(&self) -> &'static str {
        "null"
    }

    fn open(&self, _settings: &PlatformSettings) -> Result<(), BackendError> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    fn poll_events(&self) -> Vec<PlatformEvent> {
        Vec::new()
    }

    fn drain_input(&self) -> Vec<InputEvent> {
        Vec::new()
    }

    fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl FromRegistry for NullPlatform {
    const KIND: BindingKind = BindingKind::Null;

    fn from_registry(_registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_and_silence() {
        let platform = NullPlatform::new();
        platform.open(&PlatformSettings::default()).unwrap();
        assert!(platform.is_open());
        assert!(platform.poll_events().is_empty());
        assert!(platform.drain_input().is_empty());
        platform.close();
        platform.close();
        assert!(!platform.is_open());
    }
}
