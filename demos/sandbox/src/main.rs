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

use anyhow::Result;
use keel_sdk::keel_core::StorageSystem;
use keel_sdk::keel_infra::storage::store_json;
use keel_sdk::prelude::*;
use serde::Serialize;
use std::sync::Arc;

const HEARTBEAT_INTERVAL: u64 = 60;

#[derive(Serialize)]
struct SessionRecord {
    ticks: u64,
    entities: usize,
    heartbeats: u64,
}

/// Spawns entities on a heartbeat and saves a summary on shutdown.
struct SandboxGame {
    steps: FrameSteps,
    storage: Arc<dyn StorageSystem>,
    logger: Arc<CompositeLogger>,
    tick: u64,
    heartbeats: u64,
}

impl Game for SandboxGame {
    fn initialize(&mut self) {
        for _ in 0..3 {
            self.steps.entities().spawn();
        }
        emit!(
            self.logger,
            Info,
            "Sandbox initialized with {} entities.",
            self.steps.entities().entity_count()
        );
    }

    fn update(&mut self) {
        self.tick += 1;
        self.steps.update();

        for message in self.steps.messages().drain_active() {
            self.heartbeats += 1;
            let entity = self.steps.entities().spawn();
            emit!(
                self.logger,
                Info,
                "{} '{}' -> spawned entity {}",
                message.topic,
                message.payload,
                entity
            );
        }

        if self.steps.input().just_activated("spawn") {
            self.steps.entities().spawn();
        }

        if self.tick % HEARTBEAT_INTERVAL == 0 {
            self.steps
                .messages()
                .post(Message::new("heartbeat", format!("tick {}", self.tick)));
        }
    }

    fn render(&mut self, alpha: f64) {
        self.steps.render(alpha);
    }

    fn terminate(&mut self) {
        let record = SessionRecord {
            ticks: self.tick,
            entities: self.steps.entities().entity_count(),
            heartbeats: self.heartbeats,
        };
        match store_json(self.storage.as_ref(), "sandbox/last_session.json", &record) {
            Ok(()) => emit!(self.logger, Info, "Session record saved."),
            Err(e) => emit!(self.logger, Error, "Could not save the session record: {}", e),
        }
    }
}

impl FromRegistry for SandboxGame {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            steps: registry.construct::<FrameSteps>()?,
            storage: registry.resolve::<dyn StorageSystem>()?,
            logger: registry.resolve::<CompositeLogger>()?,
            tick: 0,
            heartbeats: 0,
        })
    }
}

fn main() -> Result<()> {
    let engine = Engine::builder()
        .game::<SandboxGame>()
        .config_path(concat!(env!("CARGO_MANIFEST_DIR"), "/keel.toml"))
        .graphics_settings(GraphicsApiSettings {
            depth_testing_mode: DepthTestingMode::LessEqual,
        })
        .assemble()?;

    // Route plain `log` macros from dependencies to the session sinks too.
    engine.logger().install_as_global()?;
    log::info!("Sandbox assembled, starting the frame loop.");

    let summary = engine.run()?;
    log::info!(
        "Sandbox finished after {} ticks ({:?}).",
        summary.ticks,
        summary.state
    );
    Ok(())
}
