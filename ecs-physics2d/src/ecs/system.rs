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
//! System execution framework
//!
//! Systems contain the logic that operates on entities and components. The
//! engine runs every enabled system in registration order, once per fixed
//! tick through [`System::fixed_update`] and once per rendered frame through
//! [`System::update`].

use super::component::AsAny;
use super::engine::Engine;
use crate::error::EngineResult;
use std::any::TypeId;

/// Trait for systems registered with an [`Engine`]
///
/// At most one system of each concrete type may be registered. While a
/// system's hook is running it is detached from the engine, so it can look
/// up any *other* system through [`Engine::get_system_mut`].
pub trait System: AsAny {
    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once when the system is registered
    fn added_to_engine(&mut self, _engine: &mut Engine) -> EngineResult<()> {
        Ok(())
    }

    /// Called once when the system is removed or the engine is disposed
    fn removed_from_engine(&mut self, _engine: &mut Engine) {}

    /// Fixed-rate simulation step
    fn fixed_update(&mut self, _engine: &mut Engine) -> EngineResult<()> {
        Ok(())
    }

    /// Variable-rate per-frame step
    fn update(&mut self, _engine: &mut Engine) -> EngineResult<()> {
        Ok(())
    }
}

/// Which of the two update passes is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Fixed,
    Variable,
}

pub(crate) struct SystemSlot {
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) enabled: bool,
    pub(crate) system: Option<Box<dyn System>>,
}

impl SystemSlot {
    pub(crate) fn new<S: System>(system: Box<S>) -> Self {
        SystemSlot {
            type_id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
            enabled: true,
            system: Some(system),
        }
    }
}
