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

//! A double-buffered message queue.
//!
//! Producers post into a `flume` channel acting as the standby queue. The
//! frame lifecycle rotates it into the active set at the start of each tick.

use keel_core::{CapabilityRegistry, FromRegistry, Message, MessageHandler, RegistryError};
use std::sync::{Mutex, PoisonError};

/// The reference [`MessageHandler`].
#[derive(Debug)]
pub struct QueuedMessageHandler {
    standby_tx: flume::Sender<Message>,
    standby_rx: flume::Receiver<Message>,
    active: Mutex<Vec<Message>>,
}

impl QueuedMessageHandler {
    /// Creates a handler with empty queues.
    pub fn new() -> Self {
        let (standby_tx, standby_rx) = flume::unbounded();
        Self {
            standby_tx,
            standby_rx,
            active: Mutex::new(Vec::new()),
        }
    }

    /// Returns a clone of the standby sender.
    /// Use this to post from other threads.
    pub fn sender(&self) -> flume::Sender<Message> {
        self.standby_tx.clone()
    }
}

impl Default for QueuedMessageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageHandler for QueuedMessageHandler {
    fn post(&self, message: Message) {
        let _ = self.standby_tx.send(message);
    }

    fn shift_standby_to_active_queue(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        active.clear();
        active.extend(self.standby_rx.drain());
    }

    fn drain_active(&self) -> Vec<Message> {
        std::mem::take(&mut *self.active.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn pending(&self) -> usize {
        self.standby_rx.len()
    }
}

impl FromRegistry for QueuedMessageHandler {
    fn from_registry(_registry: &CapabilityRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn posted_messages_wait_for_the_next_shift() {
        let handler = QueuedMessageHandler::new();
        handler.post(Message::new("spawn", "orc"));

        assert!(handler.drain_active().is_empty());
        assert_eq!(handler.pending(), 1);

        handler.shift_standby_to_active_queue();
        assert_eq!(handler.pending(), 0);
        assert_eq!(handler.drain_active(), vec![Message::new("spawn", "orc")]);
        assert!(handler.drain_active().is_empty());
    }

    #[test]
    fn undrained_active_messages_expire() {
        let handler = QueuedMessageHandler::new();
        handler.post(Message::new("a", ""));
        handler.shift_standby_to_active_queue();
        handler.post(Message::new("b", ""));
        handler.shift_standby_to_active_queue();

        assert_eq!(handler.drain_active(), vec![Message::new("b", "")]);
    }

    #[test]
    fn send_from_thread() {
        let handler = QueuedMessageHandler::new();
        let sender = handler.sender();

        thread::spawn(move || {
            sender
                .send(Message::new("net", "ping"))
                .expect("Send from thread failed");
        })
        .join()
        .expect("Thread join failed");

        handler.shift_standby_to_active_queue();
        assert_eq!(handler.drain_active().len(), 1);
    }
}
