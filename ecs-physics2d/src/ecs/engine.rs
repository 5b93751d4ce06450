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
//! The entity registry and system scheduler
//!
//! [`Engine`] owns every attached entity, indexes them into cached views
//! (by family, tag and layer) and drives registered systems through the two
//! update passes. Structural changes requested while a pass is running are
//! queued and applied, in request order, right after the pass completes.

use super::component::Component;
use super::entity::{Entity, EntityId};
use super::family::EntityFamily;
use super::script::{self, ScriptSystem};
use super::signal::{EntityListener, ListenerId, Signal};
use super::system::{Pass, System, SystemSlot};
use super::tag::{Layer, Tag};
use crate::config::PhysicsConfig;
use crate::error::{EngineError, EngineResult};
use crate::physics::{ColliderSystem, PhysicsSystem, TriggerEvent};
use log::{debug, error, warn};
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(u64);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Engine({})", self.0)
    }
}

/// Entity listener shared between the caller and the engine
pub type SharedListener = Rc<RefCell<dyn EntityListener>>;

enum Command {
    Add(Entity),
    Remove(EntityId),
    RemoveAll,
}

struct ListenerEntry {
    id: ListenerId,
    family: Option<EntityFamily>,
    listener: SharedListener,
}

fn same_listener(a: &SharedListener, b: &SharedListener) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Entity registry, view cache and system scheduler
pub struct Engine {
    id: EngineId,
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    family_views: HashMap<EntityFamily, Vec<EntityId>>,
    tag_views: HashMap<Tag, Vec<EntityId>>,
    layer_views: HashMap<Layer, Vec<EntityId>>,
    name_cache: HashMap<String, EntityId>,
    commands: Vec<Command>,
    systems: Vec<SystemSlot>,
    listeners: Vec<ListenerEntry>,
    family_listeners: Vec<ListenerEntry>,
    next_listener: u64,
    destroying: HashSet<EntityId>,
    entity_removed: Signal<EntityId>,
    trigger_entered: Signal<TriggerEvent>,
    trigger_exited: Signal<TriggerEvent>,
    updating: bool,
}

impl Engine {
    /// Create an engine with no systems and no entities
    pub fn new() -> Self {
        Engine {
            id: EngineId(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed)),
            entities: HashMap::new(),
            order: Vec::new(),
            family_views: HashMap::new(),
            tag_views: HashMap::new(),
            layer_views: HashMap::new(),
            name_cache: HashMap::new(),
            commands: Vec::new(),
            systems: Vec::new(),
            listeners: Vec::new(),
            family_listeners: Vec::new(),
            next_listener: 0,
            destroying: HashSet::new(),
            entity_removed: Signal::new(),
            trigger_entered: Signal::new(),
            trigger_exited: Signal::new(),
            updating: false,
        }
    }

    /// Create an engine with the stock systems
    ///
    /// Registers, in order: [`ColliderSystem`], [`ScriptSystem`] and a
    /// [`PhysicsSystem`] built from `config`.
    pub fn with_default_systems(config: PhysicsConfig) -> EngineResult<Self> {
        let mut engine = Engine::new();
        engine.add_system(ColliderSystem::new())?;
        engine.add_system(ScriptSystem::new())?;
        engine.add_system(PhysicsSystem::new(config))?;
        Ok(engine)
    }

    /// Identity of this engine
    pub fn id(&self) -> EngineId {
        self.id
    }

    /// Whether an update pass is currently running
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    // ---- entities ------------------------------------------------------

    /// Attach an entity and activate its components
    ///
    /// While a pass is running the request is queued and the entity's id is
    /// returned immediately. Scripts on the entity get their `start` hook
    /// right after activation; if one fails the entity stays attached and
    /// the error is returned.
    pub fn add_entity(&mut self, entity: Entity) -> EngineResult<EntityId> {
        if self.updating {
            let id = entity.id();
            debug!("deferring attach of {}", id);
            self.commands.push(Command::Add(entity));
            return Ok(id);
        }
        self.attach(entity)
    }

    /// Attach several entities in order
    pub fn add_entities<I>(&mut self, entities: I) -> EngineResult<Vec<EntityId>>
    where
        I: IntoIterator<Item = Entity>,
    {
        entities
            .into_iter()
            .map(|entity| self.add_entity(entity))
            .collect()
    }

    /// Detach an entity, returning it deactivated
    ///
    /// Returns `Ok(None)` when the removal was queued because a pass is
    /// running. An entity whose attach is still queued may be removed in the
    /// same pass; the two requests are applied in order. The removal signal
    /// and scripts' `on_destroy` hooks fire before listeners are notified and
    /// components deactivate.
    pub fn remove_entity(&mut self, id: EntityId) -> EngineResult<Option<Entity>> {
        if !self.entities.contains_key(&id) && !self.is_attach_pending(id) {
            return Err(EngineError::UnknownEntity(id));
        }
        if self.updating {
            debug!("deferring detach of {}", id);
            self.commands.push(Command::Remove(id));
            return Ok(None);
        }
        self.detach(id)
    }

    fn is_attach_pending(&self, id: EntityId) -> bool {
        self.commands
            .iter()
            .any(|command| matches!(command, Command::Add(entity) if entity.id() == id))
    }

    /// Detach every entity, deferred while a pass is running
    pub fn remove_all(&mut self) -> EngineResult<()> {
        if self.updating {
            self.commands.push(Command::RemoveAll);
            return Ok(());
        }
        self.detach_all()
    }

    /// Whether the entity is attached to this engine
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Borrow an attached entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutably borrow an attached entity
    ///
    /// Component data may be edited freely; structural edits are rejected
    /// by the entity itself.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// First component of type `T` on an attached entity
    pub fn component<T: Component>(&self, id: EntityId) -> EngineResult<&T> {
        self.entities
            .get(&id)
            .ok_or(EngineError::UnknownEntity(id))?
            .get_component::<T>()
    }

    /// First component of type `T` on an attached entity, mutably
    pub fn component_mut<T: Component>(&mut self, id: EntityId) -> EngineResult<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(EngineError::UnknownEntity(id))?
            .get_component_mut::<T>()
    }

    /// Find the first attached entity (in attach order) with this name
    pub fn find_entity(&mut self, name: &str) -> Option<EntityId> {
        if let Some(id) = self.name_cache.get(name) {
            return Some(*id);
        }
        let entities = &self.entities;
        let found = self.order.iter().copied().find(|id| {
            entities
                .get(id)
                .map_or(false, |entity| entity.name() == Some(name))
        })?;
        self.name_cache.insert(name.to_string(), found);
        Some(found)
    }

    /// Attached entities in attach order
    pub fn all_entities(&self) -> &[EntityId] {
        &self.order
    }

    /// Number of attached entities
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Live view of the entities matching `family`
    ///
    /// The view is built on first request and kept up to date on every
    /// attach and detach afterwards.
    pub fn entities(&mut self, family: &EntityFamily) -> &[EntityId] {
        let order = &self.order;
        let entities = &self.entities;
        self.family_views
            .entry(family.clone())
            .or_insert_with(|| {
                order
                    .iter()
                    .copied()
                    .filter(|id| entities.get(id).map_or(false, |e| family.is_member(e)))
                    .collect()
            })
            .as_slice()
    }

    /// Live view of the entities carrying `tag`
    pub fn entities_with_tag(&mut self, tag: Tag) -> &[EntityId] {
        let order = &self.order;
        let entities = &self.entities;
        self.tag_views
            .entry(tag)
            .or_insert_with(|| {
                order
                    .iter()
                    .copied()
                    .filter(|id| entities.get(id).map_or(false, |e| e.tag() == tag))
                    .collect()
            })
            .as_slice()
    }

    /// Live view of the entities on `layer`
    pub fn entities_on_layer(&mut self, layer: Layer) -> &[EntityId] {
        let order = &self.order;
        let entities = &self.entities;
        self.layer_views
            .entry(layer)
            .or_insert_with(|| {
                order
                    .iter()
                    .copied()
                    .filter(|id| entities.get(id).map_or(false, |e| e.layer() == layer))
                    .collect()
            })
            .as_slice()
    }

    /// Retag an attached entity, keeping tag views consistent
    pub fn set_tag(&mut self, id: EntityId, tag: Tag) -> EngineResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(EngineError::UnknownEntity(id))?;
        let previous = entity.replace_tag(tag);
        if previous != tag {
            if let Some(view) = self.tag_views.get_mut(&previous) {
                view.retain(|member| *member != id);
            }
            if let Some(view) = self.tag_views.get_mut(&tag) {
                view.push(id);
            }
        }
        Ok(())
    }

    /// Move an attached entity to another layer, keeping layer views consistent
    pub fn set_layer(&mut self, id: EntityId, layer: Layer) -> EngineResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(EngineError::UnknownEntity(id))?;
        let previous = entity.replace_layer(layer);
        if previous != layer {
            if let Some(view) = self.layer_views.get_mut(&previous) {
                view.retain(|member| *member != id);
            }
            if let Some(view) = self.layer_views.get_mut(&layer) {
                view.push(id);
            }
        }
        Ok(())
    }

    // ---- listeners and signals -----------------------------------------

    /// Notify `listener` about every attach and detach
    ///
    /// Registering the same listener twice is ignored and returns the
    /// original id.
    pub fn add_entity_listener(&mut self, listener: SharedListener) -> ListenerId {
        if let Some(existing) = self
            .listeners
            .iter()
            .find(|entry| same_listener(&entry.listener, &listener))
        {
            warn!("entity listener already registered on {}", self.id);
            return existing.id;
        }
        let id = self.allocate_listener_id();
        self.listeners.push(ListenerEntry {
            id,
            family: None,
            listener,
        });
        id
    }

    /// Notify `listener` about attach and detach of members of `family`
    pub fn add_family_listener(
        &mut self,
        family: EntityFamily,
        listener: SharedListener,
    ) -> ListenerId {
        if let Some(existing) = self.family_listeners.iter().find(|entry| {
            entry.family.as_ref() == Some(&family) && same_listener(&entry.listener, &listener)
        }) {
            warn!("family listener already registered on {}", self.id);
            return existing.id;
        }
        let id = self.allocate_listener_id();
        self.family_listeners.push(ListenerEntry {
            id,
            family: Some(family),
            listener,
        });
        id
    }

    /// Unregister a listener; returns false if the id is unknown
    pub fn remove_entity_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len() + self.family_listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.family_listeners.retain(|entry| entry.id != id);
        before != self.listeners.len() + self.family_listeners.len()
    }

    /// Signal fired with the id of every entity about to be removed
    pub fn entity_removed_signal(&mut self) -> &mut Signal<EntityId> {
        &mut self.entity_removed
    }

    /// Signal fired for every trigger-enter event
    pub fn trigger_enter_signal(&mut self) -> &mut Signal<TriggerEvent> {
        &mut self.trigger_entered
    }

    /// Signal fired for every trigger-exit event
    pub fn trigger_exit_signal(&mut self) -> &mut Signal<TriggerEvent> {
        &mut self.trigger_exited
    }

    pub(crate) fn dispatch_trigger_enter(&mut self, event: TriggerEvent) -> EngineResult<()> {
        self.trigger_entered.dispatch(&event);
        script::run_scripts(self, event.trigger.entity, |behaviour, ctx| {
            behaviour.on_trigger_enter(ctx, event.other)
        })
    }

    pub(crate) fn dispatch_trigger_exit(&mut self, event: TriggerEvent) -> EngineResult<()> {
        self.trigger_exited.dispatch(&event);
        script::run_scripts(self, event.trigger.entity, |behaviour, ctx| {
            behaviour.on_trigger_exit(ctx, event.other)
        })
    }

    // ---- systems -------------------------------------------------------

    /// Register a system; it runs after every system registered before it
    pub fn add_system<S: System>(&mut self, system: S) -> EngineResult<()> {
        let name = std::any::type_name::<S>();
        if self.updating {
            return Err(EngineError::UpdateInProgress("add system"));
        }
        if self.has_system::<S>() {
            return Err(EngineError::DuplicateSystem(name));
        }
        let mut system = Box::new(system);
        system.added_to_engine(self)?;
        self.systems.push(SystemSlot::new(system));
        debug!("added system {} to {}", name, self.id);
        Ok(())
    }

    /// Unregister a system and hand it back
    pub fn remove_system<S: System>(&mut self) -> EngineResult<S> {
        let name = std::any::type_name::<S>();
        if self.updating {
            return Err(EngineError::UpdateInProgress("remove system"));
        }
        let index = self
            .slot_index::<S>()
            .ok_or(EngineError::SystemNotFound(name))?;
        let slot = self.systems.remove(index);
        let mut system = slot.system.ok_or(EngineError::SystemNotFound(name))?;
        system.removed_from_engine(self);
        debug!("removed system {} from {}", name, self.id);
        system
            .into_any()
            .downcast::<S>()
            .map(|boxed| *boxed)
            .map_err(|_| EngineError::SystemNotFound(name))
    }

    /// Borrow a registered system
    pub fn get_system<S: System>(&self) -> EngineResult<&S> {
        let name = std::any::type_name::<S>();
        self.slot_index::<S>()
            .and_then(|index| self.systems[index].system.as_deref())
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EngineError::SystemNotFound(name))
    }

    /// Mutably borrow a registered system
    pub fn get_system_mut<S: System>(&mut self) -> EngineResult<&mut S> {
        let name = std::any::type_name::<S>();
        let index = self
            .slot_index::<S>()
            .ok_or(EngineError::SystemNotFound(name))?;
        self.systems[index]
            .system
            .as_deref_mut()
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EngineError::SystemNotFound(name))
    }

    /// Whether a system of type `S` is registered
    pub fn has_system<S: System>(&self) -> bool {
        self.slot_index::<S>().is_some()
    }

    /// Enable or disable a registered system
    pub fn set_system_enabled<S: System>(&mut self, enabled: bool) -> EngineResult<()> {
        let index = self
            .slot_index::<S>()
            .ok_or(EngineError::SystemNotFound(std::any::type_name::<S>()))?;
        self.systems[index].enabled = enabled;
        Ok(())
    }

    /// Whether a registered system is enabled
    pub fn is_system_enabled<S: System>(&self) -> EngineResult<bool> {
        self.slot_index::<S>()
            .map(|index| self.systems[index].enabled)
            .ok_or(EngineError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Type names of registered systems, in run order
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|slot| slot.name).collect()
    }

    // ---- passes --------------------------------------------------------

    /// Run one fixed-rate pass over every enabled system
    ///
    /// Every enabled system runs even if an earlier one fails, and every
    /// queued command is applied; the first error is returned.
    pub fn fixed_update(&mut self) -> EngineResult<()> {
        self.run_pass(Pass::Fixed)
    }

    /// Run one variable-rate pass over every enabled system
    pub fn update(&mut self) -> EngineResult<()> {
        self.run_pass(Pass::Variable)
    }

    /// Detach every entity, then remove systems in reverse registration order
    pub fn dispose(&mut self) -> EngineResult<()> {
        if self.updating {
            return Err(EngineError::UpdateInProgress("dispose"));
        }
        let detached = self.detach_all();
        self.family_views.clear();
        self.tag_views.clear();
        self.layer_views.clear();
        self.name_cache.clear();
        self.commands.clear();

        while let Some(mut slot) = self.systems.pop() {
            slot.enabled = false;
            if let Some(mut system) = slot.system.take() {
                system.removed_from_engine(self);
            }
        }

        self.listeners.clear();
        self.family_listeners.clear();
        self.entity_removed.clear();
        self.trigger_entered.clear();
        self.trigger_exited.clear();
        debug!("disposed {}", self.id);
        detached
    }

    fn run_pass(&mut self, pass: Pass) -> EngineResult<()> {
        self.updating = true;
        let mut first_error = None;

        for index in 0..self.systems.len() {
            let Some(slot) = self.systems.get_mut(index) else {
                break;
            };
            if !slot.enabled {
                continue;
            }
            let name = slot.name;
            let Some(mut system) = slot.system.take() else {
                continue;
            };
            let result = match pass {
                Pass::Fixed => system.fixed_update(self),
                Pass::Variable => system.update(self),
            };
            if let Some(slot) = self.systems.get_mut(index) {
                slot.system = Some(system);
            }
            if let Err(err) = result {
                error!("system {} failed during {:?} pass: {}", name, pass, err);
                first_error.get_or_insert(err);
            }
        }

        while !self.commands.is_empty() {
            for command in std::mem::take(&mut self.commands) {
                let result = match command {
                    Command::Add(entity) => self.attach(entity).map(|_| ()),
                    Command::Remove(id) => self.detach(id).map(|_| ()),
                    Command::RemoveAll => self.detach_all(),
                };
                if let Err(err) = result {
                    error!("deferred command failed: {}", err);
                    first_error.get_or_insert(err);
                }
            }
        }

        self.updating = false;
        first_error.map_or(Ok(()), Err)
    }

    // ---- internals -----------------------------------------------------

    fn attach(&mut self, mut entity: Entity) -> EngineResult<EntityId> {
        let id = entity.id();
        if entity.engine().is_some() {
            return Err(EngineError::EntityAlreadyAttached(id));
        }
        if entity.is_activated() {
            return Err(EngineError::EntityAlreadyActivated(id));
        }
        if self.entities.contains_key(&id) {
            return Err(EngineError::DuplicateEntity(id));
        }

        entity.set_engine(Some(self.id));
        if let Err(err) = entity.activate() {
            entity.set_engine(None);
            return Err(err);
        }

        for (family, view) in self.family_views.iter_mut() {
            if family.is_member(&entity) {
                view.push(id);
            }
        }
        if let Some(view) = self.tag_views.get_mut(&entity.tag()) {
            view.push(id);
        }
        if let Some(view) = self.layer_views.get_mut(&entity.layer()) {
            view.push(id);
        }
        self.order.push(id);
        self.entities.insert(id, entity);
        debug!("attached {} to {}", id, self.id);

        let started = script::run_scripts(self, id, |behaviour, ctx| behaviour.start(ctx));
        self.notify(id, true);
        started.map(|_| id)
    }

    fn detach(&mut self, id: EntityId) -> EngineResult<Option<Entity>> {
        if !self.entities.contains_key(&id) || !self.destroying.insert(id) {
            return Ok(None);
        }
        self.entity_removed.dispatch(&id);
        let destroyed = script::run_scripts(self, id, |behaviour, ctx| behaviour.on_destroy(ctx));
        if let Err(err) = &destroyed {
            error!("on_destroy failed for {}: {}", id, err);
        }
        self.notify(id, false);
        self.destroying.remove(&id);

        let Some(mut entity) = self.entities.remove(&id) else {
            return Ok(None);
        };
        self.order.retain(|member| *member != id);
        for view in self.family_views.values_mut() {
            view.retain(|member| *member != id);
        }
        if let Some(view) = self.tag_views.get_mut(&entity.tag()) {
            view.retain(|member| *member != id);
        }
        if let Some(view) = self.layer_views.get_mut(&entity.layer()) {
            view.retain(|member| *member != id);
        }
        self.name_cache.retain(|_, cached| *cached != id);

        entity.deactivate()?;
        entity.set_engine(None);
        debug!("detached {} from {}", id, self.id);
        Ok(Some(entity))
    }

    fn detach_all(&mut self) -> EngineResult<()> {
        let mut first_error = None;
        for id in self.order.clone() {
            if let Err(err) = self.detach(id) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn notify(&self, id: EntityId, added: bool) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let matching = self.family_listeners.iter().filter(|entry| {
            entry
                .family
                .as_ref()
                .map_or(false, |family| family.is_member(entity))
        });
        for entry in self.listeners.iter().chain(matching) {
            match entry.listener.try_borrow_mut() {
                Ok(mut listener) if added => listener.entity_added(entity),
                Ok(mut listener) => listener.entity_removed(entity),
                Err(_) => warn!("entity listener is busy; skipped notification for {}", id),
            }
        }
    }

    fn slot_index<S: System>(&self) -> Option<usize> {
        let type_id = TypeId::of::<S>();
        self.systems.iter().position(|slot| slot.type_id == type_id)
    }

    fn allocate_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("entities", &self.order.len())
            .field("systems", &self.system_names())
            .field("updating", &self.updating)
            .finish()
    }
}
