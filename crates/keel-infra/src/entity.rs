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

//! A minimal entity manager that dispatches to processors in attachment order.

use keel_core::{
    emit, CapabilityRegistry, CompositeLogger, EntityId, EntityManager, EntityProcessor,
    FromRegistry, RegistryError,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Stores entity identities and drives attached processors.
///
/// Component storage belongs to the processors themselves. Processors are
/// invoked on a snapshot of the entity set, so they may spawn or despawn while
/// being driven; the change is visible from the next pass.
pub struct SimpleEntityManager {
    logger: Arc<CompositeLogger>,
    entities: Mutex<BTreeSet<EntityId>>,
    processors: Mutex<Vec<Arc<dyn EntityProcessor>>>,
    next_id: AtomicU64,
    updates: AtomicU64,
    draws: AtomicU64,
}

impl SimpleEntityManager {
    /// Creates an empty manager.
    pub fn new(logger: Arc<CompositeLogger>) -> Self {
        Self {
            logger,
            entities: Mutex::new(BTreeSet::new()),
            processors: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            updates: AtomicU64::new(0),
            draws: AtomicU64::new(0),
        }
    }

    /// Returns the number of `update` passes so far.
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Returns the number of `draw` passes so far.
    pub fn draw_count(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    /// Returns the names of the attached processors, in order.
    pub fn processor_names(&self) -> Vec<String> {
        self.processors()
            .iter()
            .map(|processor| processor.name().to_string())
            .collect()
    }

    fn snapshot(&self) -> Vec<EntityId> {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    fn processors(&self) -> Vec<Arc<dyn EntityProcessor>> {
        self.processors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EntityManager for SimpleEntityManager {
    fn spawn(&self) -> EntityId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        id
    }

    fn despawn(&self, entity: EntityId) -> bool {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&entity)
    }

    fn entity_count(&self) -> usize {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn add_entity_processor(&self, processor: Arc<dyn EntityProcessor>) {
        emit!(self.logger, Debug, "Attached entity processor '{}'", processor.name());
        self.processors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(processor);
    }

    fn update(&self) {
        let entities = self.snapshot();
        for processor in self.processors() {
            processor.update(&entities);
        }
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn draw(&self) {
        let entities = self.snapshot();
        for processor in self.processors() {
            processor.draw(&entities);
        }
        self.draws.fetch_add(1, Ordering::Relaxed);
    }
}

impl FromRegistry for SimpleEntityManager {
    fn from_registry(registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new(registry.resolve::<CompositeLogger>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(&'static str, usize)>>,
    }

    impl EntityProcessor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn update(&self, entities: &[EntityId]) {
            self.seen.lock().unwrap().push(("update", entities.len()));
        }

        fn draw(&self, entities: &[EntityId]) {
            self.seen.lock().unwrap().push(("draw", entities.len()));
        }
    }

    fn manager() -> SimpleEntityManager {
        SimpleEntityManager::new(Arc::new(CompositeLogger::new(LevelFilter::Off)))
    }

    #[test]
    fn spawn_and_despawn() {
        let manager = manager();
        let a = manager.spawn();
        let b = manager.spawn();
        assert_ne!(a, b);
        assert_eq!(manager.entity_count(), 2);
        assert!(manager.despawn(a));
        assert!(!manager.despawn(a));
        assert_eq!(manager.entity_count(), 1);
    }

    #[test]
    fn processors_see_live_entities() {
        let manager = manager();
        let recorder = Arc::new(Recorder::default());
        manager.add_entity_processor(recorder.clone());

        manager.spawn();
        manager.spawn();
        manager.update();
        manager.draw();

        assert_eq!(
            recorder.seen.lock().unwrap().as_slice(),
            [("update", 2), ("draw", 2)]
        );
        assert_eq!(manager.update_count(), 1);
        assert_eq!(manager.draw_count(), 1);
        assert_eq!(manager.processor_names(), vec!["recorder".to_string()]);
    }
}
