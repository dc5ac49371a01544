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

//! The message queue contract.
//!
//! Messages are posted into a standby queue and only become visible after the
//! next call to [`MessageHandler::shift_standby_to_active_queue`], which the
//! frame lifecycle performs at the start of every tick. A handler therefore
//! never observes a message it produced during the same tick.

/// A message travelling between game systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The routing topic.
    pub topic: String,
    /// The payload, encoded by the sender.
    pub payload: String,
}

impl Message {
    /// Creates a message.
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// A double-buffered message queue.
pub trait MessageHandler: Send + Sync {
    /// Enqueues a message into the standby queue.
    fn post(&self, message: Message);

    /// Makes the standby messages the active set for this tick.
    ///
    /// Active messages that were not drained during the previous tick are dropped.
    fn shift_standby_to_active_queue(&self);

    /// Takes the messages that are active this tick.
    fn drain_active(&self) -> Vec<Message>;

    /// Returns the number of messages waiting in the standby queue.
    fn pending(&self) -> usize;
}
