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

//! The game lifecycle contract.

use std::sync::{Arc, Mutex};

/// The per-session game logic driven by the runtime.
///
/// The runtime calls [`initialize`](Game::initialize) once, then
/// [`update`](Game::update) followed by [`render`](Game::render) every tick,
/// then [`terminate`](Game::terminate) once.
pub trait Game: Send {
    /// Called once before the first tick.
    fn initialize(&mut self);

    /// Advances the game by one tick.
    fn update(&mut self);

    /// Renders the current state.
    ///
    /// `alpha` is the fraction of a simulation step elapsed between the last
    /// update and this render, in `[0, 1]`.
    fn render(&mut self, alpha: f64);

    /// Called once after the last tick.
    fn terminate(&mut self);
}

/// The registry contract under which the active game is bound.
pub type SharedGame = Arc<Mutex<dyn Game>>;
