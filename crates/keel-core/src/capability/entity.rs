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

//! The entity-processing contract.
//!
//! Entity storage and component iteration are owned by the implementation; the
//! composition core only needs to drive `update` and `draw` and to attach
//! processors.

use std::sync::Arc;

/// Identifies an entity within one entity manager.
pub type EntityId = u64;

/// A system that is invoked on the live entities each tick.
pub trait EntityProcessor: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &str;

    /// Simulation step. The default does nothing.
    fn update(&self, _entities: &[EntityId]) {}

    /// Draw traversal. The default does nothing.
    fn draw(&self, _entities: &[EntityId]) {}
}

/// Owns the entities and dispatches simulation and draw traversal to processors.
pub trait EntityManager: Send + Sync {
    /// Creates a new entity.
    fn spawn(&self) -> EntityId;

    /// Removes an entity. Returns `false` if it did not exist.
    fn despawn(&self, entity: EntityId) -> bool;

    /// Returns the number of live entities.
    fn entity_count(&self) -> usize;

    /// Attaches a processor. Processors run in attachment order.
    fn add_entity_processor(&self, processor: Arc<dyn EntityProcessor>);

    /// Advances the simulation by one step.
    fn update(&self);

    /// Runs draw traversal over the current state.
    fn draw(&self);
}
