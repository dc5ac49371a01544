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

//! Maps raw platform input to named actions.
//!
//! Bindings come from the `[input.bindings]` config section, one
//! `action = "KeyCode"` pair per entry. Mouse buttons use the key codes
//! `MouseLeft`, `MouseRight`, `MouseMiddle` and `Mouse<n>`.

use keel_core::{
    CapabilityRegistry, ConfigStore, FromRegistry, InputEvent, InputMapper, MouseButton, Platform,
    RegistryError,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ActionState {
    held: HashSet<String>,
    active: HashSet<String>,
    previous: HashSet<String>,
}

/// The reference [`InputMapper`], pulling events from the platform on `update`.
pub struct ActionInputMapper {
    platform: Arc<dyn Platform>,
    bindings: HashMap<String, String>,
    state: Mutex<ActionState>,
}

impl ActionInputMapper {
    /// Creates a mapper with `action -> key code` bindings.
    pub fn new(platform: Arc<dyn Platform>, bindings: HashMap<String, String>) -> Self {
        Self {
            platform,
            bindings,
            state: Mutex::new(ActionState::default()),
        }
    }

    /// Returns the key code bound to `action`.
    pub fn binding(&self, action: &str) -> Option<&str> {
        self.bindings.get(action).map(String::as_str)
    }

    fn state(&self) -> MutexGuard<'_, ActionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn mouse_key(button: MouseButton) -> String {
    match button {
        MouseButton::Left => "MouseLeft".to_string(),
        MouseButton::Right => "MouseRight".to_string(),
        MouseButton::Middle => "MouseMiddle".to_string(),
        MouseButton::Other(code) => format!("Mouse{code}"),
    }
}

impl InputMapper for ActionInputMapper {
    fn update(&self) {
        let events = self.platform.drain_input();
        let mut state = self.state();

        for event in events {
            match event {
                InputEvent::KeyPressed { key_code } => {
                    state.held.insert(key_code);
                }
                InputEvent::KeyReleased { key_code } => {
                    state.held.remove(&key_code);
                }
                InputEvent::MouseButtonPressed { button } => {
                    state.held.insert(mouse_key(button));
                }
                InputEvent::MouseButtonReleased { button } => {
                    state.held.remove(&mouse_key(button));
                }
                InputEvent::MouseMoved { .. } => {}
            }
        }

        let active: HashSet<String> = self
            .bindings
            .iter()
            .filter(|(_, key)| state.held.contains(key.as_str()))
            .map(|(action, _)| action.clone())
            .collect();
        state.previous = std::mem::replace(&mut state.active, active);
    }

    fn is_active(&self, action: &str) -> bool {
        self.state().active.contains(action)
    }

    fn just_activated(&self, action: &str) -> bool {
        let state = self.state();
        state.active.contains(action) && !state.previous.contains(action)
    }
}

impl FromRegistry for ActionInputMapper {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        let platform = registry.resolve::<dyn Platform>()?;
        let config = registry.resolve::<ConfigStore>()?;
        let bindings = config
            .section("input.bindings")
            .map(|(action, key)| (action.to_string(), key.to_string()))
            .collect();
        Ok(Self::new(platform, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{BackendError, PlatformEvent, PlatformSettings};

    #[derive(Default)]
    struct ScriptedPlatform {
        pending: Mutex<Vec<InputEvent>>,
    }

    impl ScriptedPlatform {
        fn push(&self, event: InputEvent) {
            self.pending.lock().unwrap().push(event);
        }
    }

    impl Platform for ScriptedPlatform {
        fn name(&self) -> &'static str {
            "scripted"
        }
        fn open(&self, _settings: &PlatformSettings) -> Result<(), BackendError> {
            Ok(())
        }
        fn poll_events(&self) -> Vec<PlatformEvent> {
            Vec::new()
        }
        fn drain_input(&self) -> Vec<InputEvent> {
            std::mem::take(&mut *self.pending.lock().unwrap())
        }
        fn close(&self) {}
    }

    fn key(code: &str, pressed: bool) -> InputEvent {
        let key_code = code.to_string();
        if pressed {
            InputEvent::KeyPressed { key_code }
        } else {
            InputEvent::KeyReleased { key_code }
        }
    }

    #[test]
    fn actions_follow_held_keys() {
        let platform = Arc::new(ScriptedPlatform::default());
        let bindings = HashMap::from([
            ("jump".to_string(), "Space".to_string()),
            ("fire".to_string(), "MouseLeft".to_string()),
        ]);
        let mapper = ActionInputMapper::new(platform.clone(), bindings);

        platform.push(key("Space", true));
        mapper.update();
        assert!(mapper.is_active("jump"));
        assert!(mapper.just_activated("jump"));

        mapper.update();
        assert!(mapper.is_active("jump"));
        assert!(!mapper.just_activated("jump"));

        platform.push(key("Space", false));
        platform.push(InputEvent::MouseButtonPressed {
            button: MouseButton::Left,
        });
        mapper.update();
        assert!(!mapper.is_active("jump"));
        assert!(mapper.is_active("fire"));
    }

    #[test]
    fn bindings_come_from_config() {
        let mut registry = CapabilityRegistry::new();
        registry.register_instance(Arc::new(
            ConfigStore::parse_inline("[input.bindings]\npause = \"P\"").unwrap(),
        ));
        registry.register::<dyn Platform, _>("ScriptedPlatform", |_| {
            Ok(Arc::new(ScriptedPlatform::default()) as Arc<dyn Platform>)
        });

        let mapper = registry.construct::<ActionInputMapper>().unwrap();
        assert_eq!(mapper.binding("pause"), Some("P"));
        assert_eq!(mapper.binding("jump"), None);
    }
}
