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

//! Links resolved subsystems together.

use keel_core::{
    emit, CapabilityRegistry, CompositeLogger, EntityManager, GraphicsApi, GraphicsApiSettings,
    RegistryError, RenderSystem, Runtime,
};
use std::sync::Arc;

/// The subsystems resolved during wiring.
pub struct Wiring {
    /// The graphics backend, already configured.
    pub graphics: Arc<dyn GraphicsApi>,
    /// The render system, attached to the entity manager.
    pub render_system: Arc<dyn RenderSystem>,
    /// The entity manager.
    pub entity_manager: Arc<dyn EntityManager>,
    /// The runtime that will drive the frame loop.
    pub runtime: Arc<dyn Runtime>,
}

/// Resolves and links the core subsystems in a fixed order.
///
/// 1. The graphics depth mode is applied once, before anything resolves the
///    render system, since render-system construction compiles shaders.
/// 2. The render system is attached to the entity manager as a processor.
/// 3. The runtime is resolved last.
pub fn wire(
    registry: &CapabilityRegistry,
    settings: &GraphicsApiSettings,
    logger: &CompositeLogger,
) -> Result<Wiring, RegistryError> {
    let graphics = registry.resolve::<dyn GraphicsApi>()?;
    graphics.set_depth_testing_mode(settings.depth_testing_mode);
    emit!(
        logger,
        Debug,
        "Graphics '{}' configured with depth mode {}",
        graphics.name(),
        settings.depth_testing_mode
    );

    let render_system = registry.resolve::<dyn RenderSystem>()?;
    let entity_manager = registry.resolve::<dyn EntityManager>()?;
    let processor = Arc::clone(&render_system).into_entity_processor();
    emit!(
        logger,
        Debug,
        "Attaching render system '{}' to the entity manager",
        processor.name()
    );
    entity_manager.add_entity_processor(processor);

    let runtime = registry.resolve::<dyn Runtime>()?;

    Ok(Wiring {
        graphics,
        render_system,
        entity_manager,
        runtime,
    })
}
