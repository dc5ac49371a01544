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

//! The runtime contract: the owner of the frame loop.

use super::game::SharedGame;
use super::platform::PlatformSettings;
use crate::error::BackendError;
use thiserror::Error;

/// The lifecycle of a runtime. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// `start_game` has not been called yet.
    #[default]
    Uninitialized,
    /// The frame loop is running.
    Running,
    /// The loop has exited and the game has been terminated.
    Terminated,
}

/// Errors raised by a runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `start_game` was called on a runtime that already ran.
    #[error("the runtime was already started (state: {0:?})")]
    AlreadyStarted(LifecycleState),
    /// The platform could not be opened.
    #[error("platform failed to start: {0}")]
    Platform(#[from] BackendError),
}

/// Drives the frame lifecycle of a [`Game`](super::game::Game).
pub trait Runtime: Send + Sync {
    /// Opens the platform, initializes the game, and runs ticks until terminated.
    ///
    /// Blocks the calling thread until the loop exits.
    fn start_game(&self, game: SharedGame, settings: &PlatformSettings)
        -> Result<(), RuntimeError>;

    /// Requests termination. Checked between ticks; the current tick completes.
    fn terminate(&self);

    /// Returns the current lifecycle state.
    fn state(&self) -> LifecycleState;

    /// Returns the number of ticks executed so far.
    fn tick_count(&self) -> u64;
}
