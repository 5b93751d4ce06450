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
//! Per-entity scripted behaviour
//!
//! A [`Script`] component carries one [`EntityScript`]. The engine calls
//! `start` when the entity is attached and `on_destroy` when it is removed;
//! [`ScriptSystem`] drives the per-tick hooks and the physics system delivers
//! trigger events. Every hook receives a [`ScriptContext`] giving access to
//! the engine and the script's own entity.

use super::component::{AsAny, Component};
use super::engine::Engine;
use super::entity::EntityId;
use super::family::EntityFamily;
use super::system::System;
use crate::error::EngineResult;
use crate::physics::ColliderHandle;
use log::debug;

/// Behaviour attached to an entity through a [`Script`] component
///
/// All hooks default to doing nothing.
pub trait EntityScript: AsAny {
    /// The owning entity was attached and activated
    fn start(&mut self, _ctx: &mut ScriptContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Variable-rate pass
    fn update(&mut self, _ctx: &mut ScriptContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Variable-rate pass, after `update` of the same entity
    fn late_update(&mut self, _ctx: &mut ScriptContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Fixed-rate pass
    fn fixed_update(&mut self, _ctx: &mut ScriptContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// The owning entity is about to be removed
    fn on_destroy(&mut self, _ctx: &mut ScriptContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// A trigger collider of this entity started overlapping `other`
    fn on_trigger_enter(
        &mut self,
        _ctx: &mut ScriptContext<'_>,
        _other: ColliderHandle,
    ) -> EngineResult<()> {
        Ok(())
    }

    /// A trigger collider of this entity stopped overlapping `other`
    fn on_trigger_exit(
        &mut self,
        _ctx: &mut ScriptContext<'_>,
        _other: ColliderHandle,
    ) -> EngineResult<()> {
        Ok(())
    }
}

/// Component holding one script
pub struct Script {
    name: &'static str,
    behaviour: Option<Box<dyn EntityScript>>,
}

impl Script {
    /// Wrap a behaviour
    pub fn new<S: EntityScript>(behaviour: S) -> Self {
        Script {
            name: std::any::type_name::<S>(),
            behaviour: Some(Box::new(behaviour)),
        }
    }

    /// Type name of the wrapped behaviour
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Borrow the behaviour as its concrete type
    ///
    /// Returns `None` while one of the behaviour's own hooks is running.
    pub fn behaviour<S: EntityScript>(&self) -> Option<&S> {
        let behaviour: &dyn EntityScript = self.behaviour.as_deref()?;
        behaviour.as_any().downcast_ref::<S>()
    }

    /// Mutably borrow the behaviour as its concrete type
    pub fn behaviour_mut<S: EntityScript>(&mut self) -> Option<&mut S> {
        let behaviour: &mut dyn EntityScript = self.behaviour.as_deref_mut()?;
        behaviour.as_any_mut().downcast_mut::<S>()
    }
}

impl Component for Script {}

/// Engine access handed to script hooks
pub struct ScriptContext<'a> {
    engine: &'a mut Engine,
    entity: EntityId,
}

impl<'a> ScriptContext<'a> {
    /// The entity that owns the running script
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The engine the entity is attached to
    pub fn engine(&mut self) -> &mut Engine {
        &mut *self.engine
    }

    /// First component of type `T` on the script's entity
    pub fn component<T: Component>(&self) -> EngineResult<&T> {
        self.engine.component::<T>(self.entity)
    }

    /// First component of type `T` on the script's entity, mutably
    pub fn component_mut<T: Component>(&mut self) -> EngineResult<&mut T> {
        self.engine.component_mut::<T>(self.entity)
    }

    /// Remove the script's own entity from the engine
    pub fn destroy(&mut self) -> EngineResult<()> {
        self.engine.remove_entity(self.entity).map(|_| ())
    }
}

/// Run `hook` for every script on `entity`, in component order
///
/// Each behaviour is taken out of its component for the duration of its
/// hook. Every script runs even if an earlier one fails; the first error is
/// returned.
pub(crate) fn run_scripts<F>(engine: &mut Engine, entity: EntityId, mut hook: F) -> EngineResult<()>
where
    F: FnMut(&mut dyn EntityScript, &mut ScriptContext<'_>) -> EngineResult<()>,
{
    let count = match engine.entity(entity) {
        Some(owner) => owner.count_components::<Script>(),
        None => return Ok(()),
    };
    let mut first_error = None;

    for index in 0..count {
        let taken = engine
            .entity_mut(entity)
            .and_then(|owner| owner.nth_component_mut::<Script>(index))
            .and_then(|script| script.behaviour.take());
        let Some(mut behaviour) = taken else {
            continue;
        };

        let result = {
            let mut ctx = ScriptContext {
                engine: &mut *engine,
                entity,
            };
            hook(&mut *behaviour, &mut ctx)
        };

        match engine
            .entity_mut(entity)
            .and_then(|owner| owner.nth_component_mut::<Script>(index))
        {
            Some(script) => script.behaviour = Some(behaviour),
            None => debug!("{} left the engine during a script hook", entity),
        }
        if let Err(err) = result {
            first_error.get_or_insert(err);
        }
    }

    first_error.map_or(Ok(()), Err)
}

/// Drives `update`, `late_update` and `fixed_update` of every script
pub struct ScriptSystem {
    family: EntityFamily,
}

impl ScriptSystem {
    /// Create the system
    pub fn new() -> Self {
        ScriptSystem {
            family: EntityFamily::of::<Script>(),
        }
    }

    fn run_each<F>(&self, engine: &mut Engine, mut hook: F) -> EngineResult<()>
    where
        F: FnMut(&mut Engine, EntityId) -> EngineResult<()>,
    {
        let mut first_error = None;
        for entity in engine.entities(&self.family).to_vec() {
            if let Err(err) = hook(engine, entity) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for ScriptSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ScriptSystem {
    fn name(&self) -> &str {
        "ScriptSystem"
    }

    fn fixed_update(&mut self, engine: &mut Engine) -> EngineResult<()> {
        self.run_each(engine, |engine, entity| {
            run_scripts(engine, entity, |behaviour, ctx| behaviour.fixed_update(ctx))
        })
    }

    fn update(&mut self, engine: &mut Engine) -> EngineResult<()> {
        self.run_each(engine, |engine, entity| {
            let updated = run_scripts(engine, entity, |behaviour, ctx| behaviour.update(ctx));
            let late = run_scripts(engine, entity, |behaviour, ctx| behaviour.late_update(ctx));
            updated.and(late)
        })
    }
}
