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

//! A windowless platform for servers, CI, and scripted sessions.
//!
//! Input and window events are injected programmatically. An optional frame
//! budget (`platform.frame_budget`, 0 = unlimited) makes the platform request
//! a close after that many polls.

use keel_core::{
    emit, BackendError, CapabilityRegistry, CompositeLogger, ConfigStore, FromRegistry,
    InputEvent, Platform, PlatformEvent, PlatformSettings, RegistryError,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A real platform backend with no window.
#[derive(Debug)]
pub struct HeadlessPlatform {
    logger: Arc<CompositeLogger>,
    frame_budget: u64,
    polls: AtomicU64,
    open: AtomicBool,
    close_sent: AtomicBool,
    events: Mutex<Vec<PlatformEvent>>,
    input: Mutex<Vec<InputEvent>>,
}

impl HeadlessPlatform {
    /// Creates a headless platform that closes after `frame_budget` polls (0 = never).
    pub fn new(logger: Arc<CompositeLogger>, frame_budget: u64) -> Self {
        Self {
            logger,
            frame_budget,
            polls: AtomicU64::new(0),
            open: AtomicBool::new(false),
            close_sent: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
            input: Mutex::new(Vec::new()),
        }
    }

    /// Queues an input event for the next `drain_input`.
    pub fn inject_input(&self, event: InputEvent) {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Queues a window-level event for the next `poll_events`.
    pub fn inject_event(&self, event: PlatformEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Queues a close request.
    pub fn request_close(&self) {
        self.inject_event(PlatformEvent::CloseRequested);
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn open(&self, settings: &PlatformSettings) -> Result<(), BackendError> {
        if self.open.swap(true, Ordering::AcqRel) {
            return Err(BackendError::InvalidState(
                "headless platform is already open".to_string(),
            ));
        }
        emit!(
            self.logger,
            Info,
            "Headless platform opened for '{}' ({}x{}, budget: {})",
            settings.title,
            settings.width,
            settings.height,
            self.frame_budget
        );
        Ok(())
    }

    fn poll_events(&self) -> Vec<PlatformEvent> {
        let polls = self.polls.fetch_add(1, Ordering::AcqRel) + 1;
        let mut events = std::mem::take(
            &mut *self.events.lock().unwrap_or_else(PoisonError::into_inner),
        );

        if self.frame_budget > 0
            && polls >= self.frame_budget
            && !self.close_sent.swap(true, Ordering::AcqRel)
        {
            emit!(
                self.logger,
                Debug,
                "Frame budget of {} reached",
                self.frame_budget
            );
            events.push(PlatformEvent::CloseRequested);
        }
        events
    }

    fn drain_input(&self) -> Vec<InputEvent> {
        std::mem::take(&mut *self.input.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            emit!(
                self.logger,
                Info,
                "Headless platform closed after {} polls",
                self.polls.load(Ordering::Acquire)
            );
        }
    }
}

impl FromRegistry for HeadlessPlatform {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        let config = registry.resolve::<ConfigStore>()?;
        let frame_budget = config
            .parse_or("platform.frame_budget", 0u64)
            .map_err(RegistryError::construction::<Self>)?;
        Ok(Self::new(registry.resolve::<CompositeLogger>()?, frame_budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    fn platform(budget: u64) -> HeadlessPlatform {
        HeadlessPlatform::new(Arc::new(CompositeLogger::new(LevelFilter::Off)), budget)
    }

    #[test]
    fn frame_budget_requests_close_once() {
        let platform = platform(2);
        assert!(platform.poll_events().is_empty());
        assert_eq!(platform.poll_events(), vec![PlatformEvent::CloseRequested]);
        assert!(platform.poll_events().is_empty());
    }

    #[test]
    fn injected_events_are_delivered_once() {
        let platform = platform(0);
        platform.inject_input(InputEvent::KeyPressed {
            key_code: "Space".to_string(),
        });
        platform.inject_event(PlatformEvent::FocusChanged(true));

        assert_eq!(platform.drain_input().len(), 1);
        assert!(platform.drain_input().is_empty());
        assert_eq!(platform.poll_events(), vec![PlatformEvent::FocusChanged(true)]);
    }

    #[test]
    fn double_open_is_rejected() {
        let platform = platform(0);
        let settings = PlatformSettings::default();
        platform.open(&settings).unwrap();
        assert!(platform.open(&settings).is_err());
        platform.close();
        platform.open(&settings).unwrap();
    }
}
