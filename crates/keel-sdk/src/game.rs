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

//! The reference game and the fixed per-tick step order.

use keel_core::{
    emit, CapabilityRegistry, CompositeLogger, EntityManager, FromRegistry, Game, InputMapper,
    MessageHandler, RegistryError,
};
use std::sync::Arc;

/// The subsystem steps every tick performs, in their fixed order.
///
/// `update` runs message rotation, then input sampling, then entity
/// simulation. `render` runs entity draw traversal. A game that customizes its
/// tick delegates to these methods to keep the ordering.
#[derive(Clone)]
pub struct FrameSteps {
    message_handler: Arc<dyn MessageHandler>,
    input_mapper: Arc<dyn InputMapper>,
    entity_manager: Arc<dyn EntityManager>,
}

impl FrameSteps {
    /// Bundles the collaborators driven each tick.
    pub fn new(
        message_handler: Arc<dyn MessageHandler>,
        input_mapper: Arc<dyn InputMapper>,
        entity_manager: Arc<dyn EntityManager>,
    ) -> Self {
        Self {
            message_handler,
            input_mapper,
            entity_manager,
        }
    }

    /// Rotates messages, samples input, and advances entities.
    pub fn update(&self) {
        self.message_handler.shift_standby_to_active_queue();
        self.input_mapper.update();
        self.entity_manager.update();
    }

    /// Runs draw traversal. `alpha` is not used by the entity manager.
    pub fn render(&self, _alpha: f64) {
        self.entity_manager.draw();
    }

    /// The message handler.
    pub fn messages(&self) -> &Arc<dyn MessageHandler> {
        &self.message_handler
    }

    /// The input mapper.
    pub fn input(&self) -> &Arc<dyn InputMapper> {
        &self.input_mapper
    }

    /// The entity manager.
    pub fn entities(&self) -> &Arc<dyn EntityManager> {
        &self.entity_manager
    }
}

impl FromRegistry for FrameSteps {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new(
            registry.resolve::<dyn MessageHandler>()?,
            registry.resolve::<dyn InputMapper>()?,
            registry.resolve::<dyn EntityManager>()?,
        ))
    }
}

/// A game that only performs the standard frame steps.
pub struct DefaultGame {
    steps: FrameSteps,
    logger: Arc<CompositeLogger>,
}

impl DefaultGame {
    /// Creates the game.
    pub fn new(steps: FrameSteps, logger: Arc<CompositeLogger>) -> Self {
        Self { steps, logger }
    }

    /// The frame steps this game runs.
    pub fn steps(&self) -> &FrameSteps {
        &self.steps
    }
}

impl Game for DefaultGame {
    fn initialize(&mut self) {
        emit!(
            self.logger,
            Info,
            "Game initialized with {} entities.",
            self.steps.entities().entity_count()
        );
    }

    fn update(&mut self) {
        self.steps.update();
    }

    fn render(&mut self, alpha: f64) {
        self.steps.render(alpha);
    }

    fn terminate(&mut self) {
        emit!(self.logger, Info, "Game terminated.");
    }
}

impl FromRegistry for DefaultGame {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new(
            registry.construct::<FrameSteps>()?,
            registry.resolve::<CompositeLogger>()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::{EntityId, EntityProcessor, Message};
    use keel_infra::{QueuedMessageHandler, SimpleEntityManager};
    use log::LevelFilter;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal(Mutex<Vec<&'static str>>);

    impl Journal {
        fn push(&self, entry: &'static str) {
            self.0.lock().unwrap().push(entry);
        }
        fn entries(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    struct JournalingInput(Arc<Journal>);

    impl InputMapper for JournalingInput {
        fn update(&self) {
            self.0.push("input");
        }
        fn is_active(&self, _action: &str) -> bool {
            false
        }
        fn just_activated(&self, _action: &str) -> bool {
            false
        }
    }

    struct JournalingMessages {
        inner: QueuedMessageHandler,
        journal: Arc<Journal>,
    }

    impl MessageHandler for JournalingMessages {
        fn post(&self, message: Message) {
            self.inner.post(message);
        }
        fn shift_standby_to_active_queue(&self) {
            self.journal.push("messages");
            self.inner.shift_standby_to_active_queue();
        }
        fn drain_active(&self) -> Vec<Message> {
            self.inner.drain_active()
        }
        fn pending(&self) -> usize {
            self.inner.pending()
        }
    }

    struct JournalingProcessor(Arc<Journal>);

    impl EntityProcessor for JournalingProcessor {
        fn name(&self) -> &str {
            "journal"
        }
        fn update(&self, _entities: &[EntityId]) {
            self.0.push("entities.update");
        }
        fn draw(&self, _entities: &[EntityId]) {
            self.0.push("entities.draw");
        }
    }

    #[test]
    fn steps_run_in_fixed_order() {
        let journal = Arc::new(Journal::default());
        let entities = Arc::new(SimpleEntityManager::new(Arc::new(CompositeLogger::new(
            LevelFilter::Off,
        ))));
        entities.add_entity_processor(Arc::new(JournalingProcessor(journal.clone())));
        let steps = FrameSteps::new(
            Arc::new(JournalingMessages {
                inner: QueuedMessageHandler::new(),
                journal: journal.clone(),
            }),
            Arc::new(JournalingInput(journal.clone())),
            entities,
        );

        steps.update();
        steps.render(0.5);

        assert_eq!(
            journal.entries(),
            vec!["messages", "input", "entities.update", "entities.draw"]
        );
    }
}
