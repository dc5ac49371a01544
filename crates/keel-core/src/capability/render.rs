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

//! The render system contract.

use super::entity::EntityProcessor;
use std::sync::Arc;

/// A render system is an entity processor whose draw traversal issues GPU work.
pub trait RenderSystem: EntityProcessor {
    /// Returns the number of frames submitted so far.
    fn frames_rendered(&self) -> u64;

    /// Returns this render system as a plain entity processor handle.
    fn into_entity_processor(self: Arc<Self>) -> Arc<dyn EntityProcessor>;
}
