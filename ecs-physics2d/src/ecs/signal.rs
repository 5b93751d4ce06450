// Copyright 2025 John Brosnihan
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
//! Signals and entity listeners
//!
//! A [`Signal`] is an ordered list of callbacks. Listeners receive a shared
//! reference to the payload and cannot reach the engine; scripts are the way
//! to react to events with engine access.

use super::entity::Entity;
use std::fmt;

/// Handle returned when connecting a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Ordered set of callbacks for one kind of event
pub struct Signal<T> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T> Signal<T> {
    /// Create a signal with no listeners
    pub fn new() -> Self {
        Signal {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a callback; callbacks fire in registration order
    pub fn connect(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Remove every callback
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Invoke every callback with the payload
    pub fn dispatch(&mut self, payload: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(payload);
        }
    }

    /// Number of connected callbacks
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no callbacks are connected
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Observer of entity membership changes
///
/// `entity_added` fires after the entity is activated and indexed;
/// `entity_removed` fires before it is deactivated.
pub trait EntityListener {
    /// An entity joined the engine
    fn entity_added(&mut self, entity: &Entity);

    /// An entity is leaving the engine
    fn entity_removed(&mut self, entity: &Entity);
}
