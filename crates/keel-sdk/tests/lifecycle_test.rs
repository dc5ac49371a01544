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

mod common;

use anyhow::Result;
use common::{write_config, Journal, StopOnFirstUpdate};
use keel_core::{
    CapabilityRegistry, CompositeLogger, FromRegistry, Game, LifecycleState, Message,
    RegistryError, RuntimeError,
};
use keel_infra::{NullGraphicsApi, NullPlatform};
use keel_sdk::{BootstrapError, Engine, FrameSteps};
use std::sync::Arc;
use tempfile::tempdir;

fn journal_registry() -> (CapabilityRegistry, Arc<Journal>) {
    let journal = Arc::new(Journal::default());
    let mut registry = CapabilityRegistry::new();
    registry.register_instance(Arc::clone(&journal));
    (registry, journal)
}

#[test]
fn terminate_during_first_update_completes_one_tick() -> Result<()> {
    // --- 1. Setup: an unbounded session the game stops itself ---
    let dir = tempdir()?;
    let config = write_config(&dir, 0, "");
    let (registry, journal) = journal_registry();

    // --- 2. Run ---
    let summary = Engine::builder()
        .game::<StopOnFirstUpdate>()
        .platform::<NullPlatform>()
        .graphics_api::<NullGraphicsApi>()
        .suppress_bootstrap_warnings(true)
        .with_registry(registry)
        .config_path(&config)
        .run()?;

    // --- 3. Assert: the running tick completed and nothing ran after it ---
    assert_eq!(
        journal.entries(),
        vec!["initialize", "update", "render", "terminate"]
    );
    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.state, LifecycleState::Terminated);
    Ok(())
}

#[test]
fn one_tick_renders_one_frame() -> Result<()> {
    let dir = tempdir()?;
    let config = write_config(&dir, 0, "");
    let (registry, _journal) = journal_registry();

    let engine = Engine::builder()
        .game::<StopOnFirstUpdate>()
        .platform::<NullPlatform>()
        .graphics_api::<NullGraphicsApi>()
        .suppress_bootstrap_warnings(true)
        .with_registry(registry)
        .config_path(&config)
        .assemble()?;
    let entities = Arc::clone(&engine.wiring().entity_manager);
    let render_system = Arc::clone(&engine.wiring().render_system);
    entities.spawn();

    engine.run()?;

    assert_eq!(render_system.frames_rendered(), 1);
    assert_eq!(entities.entity_count(), 1);
    Ok(())
}

#[test]
fn runtime_cannot_start_twice() -> Result<()> {
    let dir = tempdir()?;
    let config = write_config(&dir, 2, "");

    let engine = Engine::builder()
        .platform::<NullPlatform>()
        .graphics_api::<NullGraphicsApi>()
        .suppress_bootstrap_warnings(true)
        .config_path(&config)
        .assemble()?;
    let runtime = Arc::clone(engine.runtime());
    let game = engine.registry().resolve::<std::sync::Mutex<dyn Game>>()?;

    let summary = engine.run()?;
    assert_eq!(summary.ticks, 2);

    let err = runtime
        .start_game(game, &Default::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::AlreadyStarted(LifecycleState::Terminated)
    ));
    assert_eq!(runtime.tick_count(), 2);
    Ok(())
}

/// Posts one message per tick and records what it received.
struct Relay {
    steps: FrameSteps,
    journal: Arc<Journal>,
    tick: u32,
}

impl Game for Relay {
    fn initialize(&mut self) {}

    fn update(&mut self) {
        self.tick += 1;
        self.steps.update();

        let received: Vec<_> = self
            .steps
            .messages()
            .drain_active()
            .into_iter()
            .map(|m| m.payload)
            .collect();
        self.journal
            .push(format!("tick {} got [{}]", self.tick, received.join(",")));

        self.steps
            .messages()
            .post(Message::new("relay", format!("from {}", self.tick)));
    }

    fn render(&mut self, alpha: f64) {
        self.steps.render(alpha);
    }

    fn terminate(&mut self) {}
}

impl FromRegistry for Relay {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            steps: registry.construct::<FrameSteps>()?,
            journal: registry.resolve::<Journal>()?,
            tick: 0,
        })
    }
}

#[test]
fn messages_arrive_one_tick_later() -> Result<()> {
    let dir = tempdir()?;
    let config = write_config(&dir, 3, "");
    let (registry, journal) = journal_registry();

    Engine::builder()
        .game::<Relay>()
        .platform::<NullPlatform>()
        .graphics_api::<NullGraphicsApi>()
        .suppress_bootstrap_warnings(true)
        .with_registry(registry)
        .config_path(&config)
        .run()?;

    assert_eq!(
        journal.entries(),
        vec![
            "tick 1 got []",
            "tick 2 got [from 1]",
            "tick 3 got [from 2]",
        ]
    );
    Ok(())
}

/// A game whose construction always fails.
struct Broken;

impl Game for Broken {
    fn initialize(&mut self) {}
    fn update(&mut self) {}
    fn render(&mut self, _alpha: f64) {}
    fn terminate(&mut self) {}
}

impl FromRegistry for Broken {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        registry.resolve::<CompositeLogger>()?;
        Err(RegistryError::construction::<Self>("no save data"))
    }
}

#[test]
fn failing_game_construction_aborts_assembly() -> Result<()> {
    let dir = tempdir()?;
    let config = write_config(&dir, 1, "");

    let result = Engine::builder()
        .game::<Broken>()
        .platform::<NullPlatform>()
        .graphics_api::<NullGraphicsApi>()
        .suppress_bootstrap_warnings(true)
        .config_path(&config)
        .assemble();

    assert!(matches!(
        result,
        Err(BootstrapError::Registry(RegistryError::Construction { .. }))
    ));
    Ok(())
}
